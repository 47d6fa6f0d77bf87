use anyhow::{Context, Result};
use std::io::Write;

use super::scene::Frame;

/// 描画命令を受け取る描画面
pub trait RenderSurface: Send {
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        (**self).present(frame)
    }
}

/// フレームを1行1 JSON で書き出す
pub struct JsonLinesSurface<W: Write> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSurface<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> RenderSurface for JsonLinesSurface<W> {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        serde_json::to_writer(&mut self.writer, frame).context("Failed to encode frame")?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// 受け取ったフレームを保持するだけの描画面
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub frames: Vec<Frame>,
}

impl RenderSurface for RecordingSurface {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
