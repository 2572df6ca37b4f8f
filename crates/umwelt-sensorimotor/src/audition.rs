// Copyright 2026 Umwelt Project Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Audio feature extraction.

The acoustic twin of the vision module: mono PCM goes in, a bounded numeric
bundle comes out, the waveform stays here. Spectral work runs over a
Hamming-windowed forward FFT truncated to a power of two, so cost per buffer
is capped regardless of recording length.
*/

use rustfft::num_complex::Complex32;
use rustfft::FftPlanner;

use umwelt_structures::{AudioFeatures, UmweltError, UmweltResult};

/// Longest FFT the extractor will run; longer buffers are truncated.
pub const MAX_FFT_SAMPLES: usize = 8192;

/// Band edges in Hz: low is everything below the first, high everything
/// above the second.
const LOW_BAND_EDGE_HZ: f32 = 250.0;
const HIGH_BAND_EDGE_HZ: f32 = 2000.0;

/// RMS of a full-scale sine; loudness is normalized against it.
const FULL_SCALE_SINE_RMS: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Mid-band share above which a non-quiet signal reads as speech-like.
const SPEECH_MID_SHARE: f32 = 45.0;
const SPEECH_MIN_LOUDNESS: f32 = 5.0;

/// Extract the numeric feature bundle from one mono PCM buffer.
///
/// # Arguments
/// * `samples` - Mono PCM in -1..1
/// * `sample_rate` - Samples per second; zero is a contract violation
///
/// An empty buffer is not an error: it yields the trivial silent bundle.
pub fn extract_audio_features(samples: &[f32], sample_rate: u32) -> UmweltResult<AudioFeatures> {
    if sample_rate == 0 {
        return Err(UmweltError::bad_parameters("sample rate must be non-zero"));
    }
    if samples.is_empty() {
        return Ok(AudioFeatures::default());
    }

    let rms = (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt();
    let loudness = (rms / FULL_SCALE_SINE_RMS * 100.0).min(100.0);

    let n = fft_size(samples.len());
    if n < 4 {
        // too short to resolve any band; loudness is all we know
        return Ok(AudioFeatures {
            loudness,
            sample_count: samples.len(),
            ..Default::default()
        });
    }

    let window = hamming_window(n);
    let mut buffer: Vec<Complex32> = samples[..n]
        .iter()
        .zip(&window)
        .map(|(s, w)| Complex32::new(s * w, 0.0))
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let bin_hz = sample_rate as f32 / n as f32;
    let mut low = 0.0f32;
    let mut mid = 0.0f32;
    let mut high = 0.0f32;
    let mut peak_power = 0.0f32;
    let mut peak_hz = 0.0f32;

    // positive frequencies only; bin 0 is DC and carries no pitch
    for (k, value) in buffer.iter().enumerate().take(n / 2).skip(1) {
        let power = value.norm_sqr();
        let hz = k as f32 * bin_hz;
        if hz < LOW_BAND_EDGE_HZ {
            low += power;
        } else if hz <= HIGH_BAND_EDGE_HZ {
            mid += power;
        } else {
            high += power;
        }
        if power > peak_power {
            peak_power = power;
            peak_hz = hz;
        }
    }

    let total = low + mid + high;
    let (low_band, mid_band, high_band, dominant_frequency_hz) = if total > f32::EPSILON {
        (
            low / total * 100.0,
            mid / total * 100.0,
            high / total * 100.0,
            peak_hz,
        )
    } else {
        (0.0, 0.0, 0.0, 0.0)
    };

    let speech_likely = mid_band >= SPEECH_MID_SHARE && loudness >= SPEECH_MIN_LOUDNESS;

    Ok(AudioFeatures {
        loudness,
        low_band,
        mid_band,
        high_band,
        dominant_frequency_hz,
        speech_likely,
        sample_count: samples.len(),
    })
}

/// Largest power of two no greater than `len`, capped at
/// [`MAX_FFT_SAMPLES`].
fn fft_size(len: usize) -> usize {
    let capped = len.min(MAX_FFT_SAMPLES);
    if capped == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - capped.leading_zeros())
    }
}

fn hamming_window(n: usize) -> Vec<f32> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| {
            0.54 - 0.46 * (2.0 * std::f32::consts::PI * i as f32 / (n as f32 - 1.0)).cos()
        })
        .collect()
}
