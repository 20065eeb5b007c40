use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Single-line spinner used while hashing ROMs.
///
/// Hidden when `hidden` is set (quiet mode, or verbose mode where per-ROM
/// debug lines already show progress).
pub(crate) fn spinner(hidden: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if hidden {
        pb.set_draw_target(ProgressDrawTarget::hidden());
        return pb;
    }
    let style = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("/-\\|");
    pb.set_style(style);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
