//! Sample sources feeding the sampling producer.

/// Full-scale value of a 12-bit ADC.
pub const ADC_MAX: u16 = 4095;

/// Something that yields one ADC reading per call.
pub trait SignalSource: Send {
    /// Reads the next sample.
    fn read(&mut self) -> u16;
}

/// Deterministic triangle wave sweeping `0..=ADC_MAX`.
///
/// Stands in for a real analog input on hosts without one.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    position: u16,
    step: u16,
    rising: bool,
}

impl SyntheticSource {
    /// Creates a wave that moves `step` counts per sample.
    #[must_use]
    pub fn new(step: u16) -> Self {
        Self {
            position: 0,
            step: step.clamp(1, ADC_MAX),
            rising: true,
        }
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(64)
    }
}

impl SignalSource for SyntheticSource {
    fn read(&mut self) -> u16 {
        let sample = self.position;
        if self.rising {
            let next = self.position.saturating_add(self.step);
            if next >= ADC_MAX {
                self.position = ADC_MAX;
                self.rising = false;
            } else {
                self.position = next;
            }
        } else {
            let next = self.position.saturating_sub(self.step);
            if next == 0 {
                self.rising = true;
            }
            self.position = next;
        }
        sample
    }
}
