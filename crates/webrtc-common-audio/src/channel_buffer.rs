//! Multi-channel, multi-band sample storage matching WebRTC's `ChannelBuffer`.
//!
//! One contiguous allocation holds every channel's full-band frame. A frame
//! can be viewed whole or as `num_bands` equal sub-band slices:
//!
//! ```text
//! channel 0                     channel 1
//! [ band 0 | band 1 | band 2 ]  [ band 0 | band 1 | band 2 ]
//! ```
//!
//! The splitting filter reads a channel's full-band frame through
//! [`ChannelBuffer::bands`] and writes each sub-band through
//! [`ChannelBuffer::channel_mut`].

#[derive(derive_more::Debug, Clone)]
pub struct ChannelBuffer<T> {
    #[debug(skip)]
    data: Vec<T>,
    num_frames: usize,
    num_frames_per_band: usize,
    num_allocated_channels: usize,
    num_channels: usize,
    num_bands: usize,
}

impl<T: Clone + Default> ChannelBuffer<T> {
    /// Creates a zeroed buffer of `num_frames` full-band samples per channel.
    ///
    /// # Panics
    ///
    /// Panics if `num_bands` or `num_channels` is zero, or `num_frames` is not
    /// a multiple of `num_bands`.
    pub fn new(num_frames: usize, num_channels: usize, num_bands: usize) -> Self {
        assert!(num_bands > 0, "num_bands must be > 0");
        assert!(num_channels > 0, "num_channels must be > 0");
        assert!(
            num_frames.is_multiple_of(num_bands),
            "num_frames ({num_frames}) must be divisible by num_bands ({num_bands})"
        );
        Self {
            data: vec![T::default(); num_frames * num_channels],
            num_frames,
            num_frames_per_band: num_frames / num_bands,
            num_allocated_channels: num_channels,
            num_channels,
            num_bands,
        }
    }

    /// Creates a buffer without sub-band structure.
    pub fn new_single_band(num_frames: usize, num_channels: usize) -> Self {
        Self::new(num_frames, num_channels, 1)
    }
}

impl<T> ChannelBuffer<T> {
    /// Full-band samples per channel.
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Samples in each sub-band; `num_frames() == num_bands() * num_frames_per_band()`.
    #[inline]
    pub fn num_frames_per_band(&self) -> usize {
        self.num_frames_per_band
    }

    /// Visible channels.
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    #[inline]
    pub fn num_allocated_channels(&self) -> usize {
        self.num_allocated_channels
    }

    #[inline]
    pub fn num_bands(&self) -> usize {
        self.num_bands
    }

    /// Hides or restores channels without reallocating.
    ///
    /// # Panics
    ///
    /// Panics if `num_channels` exceeds the allocated channel count.
    pub fn set_num_channels(&mut self, num_channels: usize) {
        assert!(
            num_channels <= self.num_allocated_channels,
            "num_channels ({num_channels}) exceeds allocated ({})",
            self.num_allocated_channels
        );
        self.num_channels = num_channels;
    }

    #[inline]
    fn band_start(&self, band: usize, channel: usize) -> usize {
        debug_assert!(band < self.num_bands);
        debug_assert!(channel < self.num_allocated_channels);
        channel * self.num_frames + band * self.num_frames_per_band
    }

    /// One sub-band of one channel.
    #[inline]
    pub fn channel(&self, band: usize, channel: usize) -> &[T] {
        let start = self.band_start(band, channel);
        &self.data[start..start + self.num_frames_per_band]
    }

    #[inline]
    pub fn channel_mut(&mut self, band: usize, channel: usize) -> &mut [T] {
        let start = self.band_start(band, channel);
        &mut self.data[start..start + self.num_frames_per_band]
    }

    /// A channel's whole frame, all bands back to back.
    #[inline]
    pub fn bands(&self, channel: usize) -> &[T] {
        let start = self.band_start(0, channel);
        &self.data[start..start + self.num_frames]
    }

    #[inline]
    pub fn bands_mut(&mut self, channel: usize) -> &mut [T] {
        let start = self.band_start(0, channel);
        &mut self.data[start..start + self.num_frames]
    }

    /// Iterates a channel's sub-bands in band order.
    pub fn bands_view(&self, channel: usize) -> impl ExactSizeIterator<Item = &[T]> {
        self.bands(channel).chunks_exact(self.num_frames_per_band)
    }

    /// Mutable counterpart of [`bands_view`](Self::bands_view).
    pub fn bands_view_mut(&mut self, channel: usize) -> impl ExactSizeIterator<Item = &mut [T]> {
        let per_band = self.num_frames_per_band;
        self.bands_mut(channel).chunks_exact_mut(per_band)
    }

    /// All allocated samples, channel-major.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Copy> ChannelBuffer<T> {
    /// Sets every allocated sample to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_band_dimensions() {
        let buf = ChannelBuffer::<f32>::new(320, 2, 2);
        assert_eq!(buf.num_frames(), 320);
        assert_eq!(buf.num_frames_per_band(), 160);
        assert_eq!(buf.num_bands(), 2);
        assert_eq!(buf.num_channels(), 2);
        assert_eq!(buf.data().len(), 640);
    }

    #[test]
    fn sub_bands_tile_the_full_band_frame() {
        let mut buf = ChannelBuffer::<i16>::new(6, 2, 3);
        buf.channel_mut(0, 1).copy_from_slice(&[1, 2]);
        buf.channel_mut(1, 1).copy_from_slice(&[3, 4]);
        buf.channel_mut(2, 1).copy_from_slice(&[5, 6]);

        assert_eq!(buf.bands(0), &[0; 6]);
        assert_eq!(buf.bands(1), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(buf.data(), &[0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn bands_view_yields_each_band() {
        let mut buf = ChannelBuffer::<i16>::new(4, 1, 2);
        buf.bands_mut(0).copy_from_slice(&[7, 8, 9, 10]);
        let views: Vec<&[i16]> = buf.bands_view(0).collect();
        assert_eq!(views, vec![&[7, 8][..], &[9, 10][..]]);

        for band in buf.bands_view_mut(0) {
            band[0] = 0;
        }
        assert_eq!(buf.bands(0), &[0, 8, 0, 10]);
    }

    #[test]
    fn hidden_channels_keep_their_storage() {
        let mut buf = ChannelBuffer::<f32>::new_single_band(8, 3);
        buf.set_num_channels(1);
        assert_eq!(buf.num_channels(), 1);
        assert_eq!(buf.num_allocated_channels(), 3);
        assert_eq!(buf.data().len(), 24);
        buf.set_num_channels(3);
        assert_eq!(buf.num_channels(), 3);
    }

    #[test]
    fn fill_overwrites_every_sample() {
        let mut buf = ChannelBuffer::<f32>::new(480, 2, 3);
        buf.fill(0.5);
        assert!(buf.data().iter().all(|&s| s == 0.5));
    }

    #[test]
    #[should_panic(expected = "exceeds allocated")]
    fn too_many_channels_panics() {
        let mut buf = ChannelBuffer::<f32>::new_single_band(8, 2);
        buf.set_num_channels(3);
    }

    #[test]
    #[should_panic(expected = "divisible by num_bands")]
    fn frames_must_divide_into_bands() {
        let _ = ChannelBuffer::<f32>::new(321, 1, 2);
    }
}
