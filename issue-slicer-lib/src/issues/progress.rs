/// A trait for reporting progress of long-running downloads.
pub trait Progress: Send + Sync {
    /// Set the phase label for the current operation (e.g., the repository being downloaded).
    fn set_phase(&self, phase: &str);

    /// Report how many items have been processed out of the expected total.
    fn set_position(&self, processed: u64, total: u64);

    /// Print a message line without disrupting the progress indicator.
    fn println(&self, msg: &str);

    /// Finish and clear the progress indicator.
    fn done(&self);
}
