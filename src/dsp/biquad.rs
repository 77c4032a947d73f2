//! Second-order IIR section used by the general filter.

use std::f64::consts::PI;

/// Response shape of a biquad section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BiquadShape {
    /// Bell curve boost/cut
    #[default]
    Peak,
    /// Constant 0 dB peak gain band-pass
    Bandpass,
    /// Band-reject
    Notch,
    /// Flat magnitude, phase shift around the centre frequency
    Allpass,
}

impl BiquadShape {
    /// Index order matches the "General Filter Mode" choice list
    pub const ALL: [BiquadShape; 4] = [
        BiquadShape::Peak,
        BiquadShape::Bandpass,
        BiquadShape::Notch,
        BiquadShape::Allpass,
    ];
}

/// Biquad filter coefficients, normalised by a0
/// H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Default for BiquadCoeffs {
    /// Unity pass-through
    fn default() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }
}

impl BiquadCoeffs {
    /// Audio EQ Cookbook formulas
    pub fn calculate(
        shape: BiquadShape,
        sample_rate: f64,
        frequency: f64,
        q: f64,
        gain_db: f64,
    ) -> Self {
        // Keep the corner below Nyquist
        let freq = frequency.clamp(10.0, (sample_rate * 0.49).max(10.0));
        let q = q.max(1e-3);

        let w0 = 2.0 * PI * freq / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);

        let (b0, b1, b2, a0, a1, a2) = match shape {
            BiquadShape::Peak => {
                let a = 10.0_f64.powf(gain_db / 40.0);
                (
                    1.0 + alpha * a,
                    -2.0 * cos_w0,
                    1.0 - alpha * a,
                    1.0 + alpha / a,
                    -2.0 * cos_w0,
                    1.0 - alpha / a,
                )
            }
            BiquadShape::Bandpass => (
                alpha,
                0.0,
                -alpha,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            BiquadShape::Notch => (
                1.0,
                -2.0 * cos_w0,
                1.0,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            BiquadShape::Allpass => (
                1.0 - alpha,
                -2.0 * cos_w0,
                1.0 + alpha,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
        };

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Magnitude response at `frequency`
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        let w = 2.0 * PI * frequency / sample_rate;
        let (cos1, sin1) = (w.cos(), w.sin());
        let (cos2, sin2) = ((2.0 * w).cos(), (2.0 * w).sin());

        let num_re = self.b0 + self.b1 * cos1 + self.b2 * cos2;
        let num_im = -(self.b1 * sin1 + self.b2 * sin2);
        let den_re = 1.0 + self.a1 * cos1 + self.a2 * cos2;
        let den_im = -(self.a1 * sin1 + self.a2 * sin2);

        ((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im)).sqrt()
    }
}

/// Biquad filter history for one channel (Direct Form I)
#[derive(Debug, Clone, Copy, Default)]
pub struct BiquadState {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadState {
    #[inline]
    pub fn process(&mut self, input: f64, coeffs: &BiquadCoeffs) -> f64 {
        let output = coeffs.b0 * input + coeffs.b1 * self.x1 + coeffs.b2 * self.x2
            - coeffs.a1 * self.y1
            - coeffs.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SR: f64 = 48000.0;

    #[test]
    fn test_flat_peak_is_identity() {
        let c = BiquadCoeffs::calculate(BiquadShape::Peak, SR, 750.0, 1.0, 0.0);
        assert_relative_eq!(c.b0, 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.b1, c.a1, epsilon = 1e-12);
        assert_relative_eq!(c.b2, c.a2, epsilon = 1e-12);
    }

    #[test]
    fn test_peak_gain_at_centre() {
        let c = BiquadCoeffs::calculate(BiquadShape::Peak, SR, 1000.0, 1.0, 12.0);
        let db = 20.0 * c.magnitude_at(1000.0, SR).log10();
        assert_relative_eq!(db, 12.0, epsilon = 0.01);
    }

    #[test]
    fn test_notch_and_bandpass_shapes() {
        let notch = BiquadCoeffs::calculate(BiquadShape::Notch, SR, 1000.0, 2.0, 0.0);
        assert!(notch.magnitude_at(1000.0, SR) < 1e-6);
        assert_relative_eq!(notch.magnitude_at(50.0, SR), 1.0, epsilon = 0.01);

        let bp = BiquadCoeffs::calculate(BiquadShape::Bandpass, SR, 1000.0, 2.0, 0.0);
        assert_relative_eq!(bp.magnitude_at(1000.0, SR), 1.0, epsilon = 1e-6);
        assert!(bp.magnitude_at(50.0, SR) < 0.1);
    }

    #[test]
    fn test_allpass_is_flat() {
        let c = BiquadCoeffs::calculate(BiquadShape::Allpass, SR, 2000.0, 0.7, 0.0);
        for f in [50.0, 500.0, 2000.0, 10000.0] {
            assert_relative_eq!(c.magnitude_at(f, SR), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_state_reset() {
        let c = BiquadCoeffs::calculate(BiquadShape::Bandpass, SR, 1000.0, 1.0, 0.0);
        let mut state = BiquadState::default();
        state.process(1.0, &c);
        state.reset();
        assert_eq!(state.process(0.0, &c), 0.0);
    }
}
