//! Waveform canvas port interface

/// Port for drawing the live waveform.
///
/// The visualizer drives this once per frame: clear, one polyline in
/// canvas coordinates, present.
pub trait WaveformCanvas {
    /// Canvas dimensions as (width, height)
    fn size(&self) -> (u32, u32);

    /// Erase the previous frame
    fn clear(&mut self);

    /// Draw a connected line through the given points
    fn draw_polyline(&mut self, points: &[(f32, f32)]);

    /// Flush the frame to the display
    fn present(&mut self);
}
