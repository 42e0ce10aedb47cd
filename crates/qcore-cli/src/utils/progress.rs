use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use qcore::engine::progress::{Progress, ProgressReporter};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;

/// Draws workflow phases as a spinner and per-atom passes as a bar on stderr.
///
/// The phase name stays on screen as the bar prefix while an atom pass runs under it.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// A handler that draws nothing, used with `--quiet`.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        pb.finish_and_clear();
        Self { pb }
    }

    /// A reporter that can be handed to core workflows, including across threads.
    pub fn reporter(&self) -> ProgressReporter<'static> {
        let pb = self.pb.clone();
        ProgressReporter::with_callback(Box::new(move |event| render(&pb, event)))
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn render(pb: &ProgressBar, event: Progress) {
    match event {
        Progress::PhaseStart { name } => {
            pb.reset();
            pb.set_length(0);
            pb.set_style(spinner_style());
            pb.set_prefix(name);
            pb.set_message("working");
            pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        }
        Progress::PhaseFinish => {
            pb.disable_steady_tick();
            pb.finish_with_message("done");
        }
        Progress::TaskStart { total_steps } => {
            pb.disable_steady_tick();
            pb.reset();
            pb.set_length(total_steps);
            pb.set_style(bar_style());
        }
        Progress::TaskIncrement => pb.inc(1),
        Progress::TaskFinish => {
            if let Some(length) = pb.length() {
                pb.set_position(length);
            }
            pb.finish();
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {prefix}: {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:<20} [{bar:40.cyan/blue}] {pos}/{len} atoms ({secs_left})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key(
            "secs_left",
            |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
            },
        )
        .progress_chars("##-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_starts_finished_and_empty() {
        let handler = CliProgressHandler::hidden();
        assert_eq!(handler.pb.length(), Some(0));
        assert!(handler.pb.is_finished());
    }

    #[test]
    fn occupancy_pass_fills_the_bar_under_its_phase() {
        let handler = CliProgressHandler::hidden();
        let reporter = handler.reporter();

        reporter.report(Progress::PhaseStart {
            name: "Physical Occupancy",
        });
        assert_eq!(handler.pb.prefix(), "Physical Occupancy");
        assert!(!handler.pb.is_finished());

        reporter.report(Progress::TaskStart { total_steps: 40 });
        reporter.report(Progress::TaskIncrement);
        assert_eq!(handler.pb.length(), Some(40));
        assert_eq!(handler.pb.position(), 1);

        reporter.report(Progress::TaskFinish);
        assert!(handler.pb.is_finished());
        assert_eq!(handler.pb.position(), 40);

        reporter.report(Progress::PhaseFinish);
        assert_eq!(handler.pb.prefix(), "Physical Occupancy");
        assert_eq!(handler.pb.message(), "done");
    }

    #[test]
    fn reporter_forwards_phases_from_another_thread() {
        let handler = CliProgressHandler::hidden();
        let reporter = handler.reporter();

        thread::spawn(move || {
            reporter.phase("Tunneling Search", || ());
        })
        .join()
        .unwrap();

        assert!(handler.pb.is_finished());
        assert_eq!(handler.pb.prefix(), "Tunneling Search");
        assert_eq!(handler.pb.message(), "done");
    }
}
