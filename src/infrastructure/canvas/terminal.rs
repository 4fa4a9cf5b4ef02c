//! Terminal waveform rendering
//!
//! Collapses each frame's polyline into one row of block characters,
//! one column per character cell, and hands the finished row to a sink
//! (typically a status line redraw).

use std::sync::Arc;

use crate::application::ports::WaveformCanvas;

const BLOCKS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Receives each rendered row of the waveform
pub type RowSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Character-cell canvas for the live waveform
pub struct TerminalWaveform {
    width: u32,
    height: u32,
    // Peak deviation from center per column, 0.0..=1.0
    columns: Vec<f32>,
    sink: RowSink,
}

impl TerminalWaveform {
    pub fn new(width: u32, sink: RowSink) -> Self {
        Self {
            width,
            height: 100,
            columns: vec![0.0; width as usize],
            sink,
        }
    }

    fn render_row(&self) -> String {
        self.columns
            .iter()
            .map(|&deviation| {
                let level = (deviation * (BLOCKS.len() - 1) as f32).round() as usize;
                BLOCKS[level.min(BLOCKS.len() - 1)]
            })
            .collect()
    }
}

impl WaveformCanvas for TerminalWaveform {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.columns.iter_mut().for_each(|c| *c = 0.0);
    }

    fn draw_polyline(&mut self, points: &[(f32, f32)]) {
        let half_height = self.height as f32 / 2.0;
        for &(x, y) in points {
            let col = (x as usize).min(self.columns.len().saturating_sub(1));
            let deviation = ((y - half_height).abs() / half_height).clamp(0.0, 1.0);
            if deviation > self.columns[col] {
                self.columns[col] = deviation;
            }
        }
    }

    fn present(&mut self) {
        let row = self.render_row();
        (self.sink)(&row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    fn capture_sink() -> (RowSink, Arc<StdMutex<Vec<String>>>) {
        let rows: Arc<StdMutex<Vec<String>>> = Arc::new(StdMutex::new(Vec::new()));
        let sink_rows = Arc::clone(&rows);
        let sink: RowSink = Arc::new(move |row: &str| {
            if let Ok(mut rows) = sink_rows.lock() {
                rows.push(row.to_string());
            }
        });
        (sink, rows)
    }

    #[test]
    fn silence_renders_blank_row() {
        let (sink, rows) = capture_sink();
        let mut canvas = TerminalWaveform::new(10, sink);
        let (w, h) = canvas.size();
        assert_eq!(w, 10);
        canvas.clear();
        canvas.draw_polyline(&[(0.0, h as f32 / 2.0), (5.0, h as f32 / 2.0)]);
        canvas.present();
        assert_eq!(rows.lock().unwrap()[0], " ".repeat(10));
    }

    #[test]
    fn full_amplitude_renders_full_block() {
        let (sink, rows) = capture_sink();
        let mut canvas = TerminalWaveform::new(4, sink);
        canvas.clear();
        canvas.draw_polyline(&[(0.0, 0.0), (1.0, 100.0)]);
        canvas.present();
        let row = rows.lock().unwrap()[0].clone();
        let chars: Vec<char> = row.chars().collect();
        assert_eq!(chars[0], '█');
        assert_eq!(chars[1], '█');
        assert_eq!(chars[2], ' ');
    }

    #[test]
    fn clear_resets_previous_frame() {
        let (sink, rows) = capture_sink();
        let mut canvas = TerminalWaveform::new(3, sink);
        canvas.draw_polyline(&[(0.0, 0.0)]);
        canvas.present();
        canvas.clear();
        canvas.present();
        let rows = rows.lock().unwrap();
        assert_ne!(rows[0], rows[1]);
        assert_eq!(rows[1], "   ");
    }

    #[test]
    fn out_of_range_x_lands_in_last_column() {
        let (sink, rows) = capture_sink();
        let mut canvas = TerminalWaveform::new(3, sink);
        canvas.draw_polyline(&[(99.0, 0.0)]);
        canvas.present();
        let row = rows.lock().unwrap()[0].clone();
        assert_eq!(row.chars().last().unwrap(), '█');
    }
}
