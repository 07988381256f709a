use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes:>12}/{total_bytes:<12} {bytes_per_sec:>12} {eta:>4} {msg}";
const COUNTER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {bytes:>12} {bytes_per_sec:>12} {msg}";

/// Progress derived from received and total bytes. Indeterminate when the
/// server declared no usable total; consumers must not render a percentage
/// for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressSample {
    Percent(f64),
    Indeterminate,
}

/// Percent downloaded, clamped to 100 when a short Content-Length undercounts
/// the actual body.
pub fn sample(received_bytes: u64, total_bytes: Option<u64>) -> ProgressSample {
    match total_bytes {
        Some(total) if total > 0 => {
            let percent = (received_bytes as f64 / total as f64) * 100.0;
            ProgressSample::Percent(percent.min(100.0))
        }
        _ => ProgressSample::Indeterminate,
    }
}

pub struct ProgressRenderer {
    pb: ProgressBar,
}

impl ProgressRenderer {
    pub fn new(total_bytes: Option<u64>, filename: &str) -> Self {
        let pb = match total_bytes {
            Some(total) if total > 0 => {
                let pb = ProgressBar::new(total);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template(BAR_TEMPLATE)
                        .unwrap()
                        .progress_chars("=>-"),
                );
                pb
            }
            _ => {
                // No declared total: byte counter without a bar or eta.
                let pb = ProgressBar::no_length();
                pb.set_style(ProgressStyle::default_bar().template(COUNTER_TEMPLATE).unwrap());
                pb
            }
        };
        pb.set_draw_target(ProgressDrawTarget::stderr_with_hz(5));
        pb.set_message(format!("Downloading {}", filename));
        Self { pb }
    }

    pub fn update(&self, received_bytes: u64, sample: ProgressSample) {
        self.pb.set_position(received_bytes);
        if let ProgressSample::Indeterminate = sample {
            self.pb.tick();
        }
    }

    pub fn finish(&self, msg: String) {
        self.pb.finish_with_message(msg);
    }

    pub fn abandon(&self, msg: String) {
        self.pb.abandon_with_message(msg);
    }
}
