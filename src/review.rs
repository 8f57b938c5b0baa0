//! Review and finalize dialog
//!
//! `Reviewing -> Finalizing -> Completed`. Finalizing is a timed,
//! simulated step driven by a tokio task; there is no failure branch.
//! While finalizing the dialog refuses to close, and dropping the dialog
//! aborts the pending timer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{Result, WizardError};
use crate::export;
use crate::models::{OrderMetadata, RosterRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Reviewing,
    Finalizing,
    Completed,
}

impl ReviewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewState::Reviewing => "reviewing",
            ReviewState::Finalizing => "finalizing",
            ReviewState::Completed => "completed",
        }
    }
}

/// What closing the dialog means for the surrounding screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Back to roster editing, nothing changed
    BackToEditing,
    /// Session is over, return to the intake screen with nothing carried
    SessionFinished,
}

struct FinalizeTimer {
    handle: JoinHandle<()>,
    done: oneshot::Receiver<()>,
}

impl FinalizeTimer {
    fn start(delay: Duration) -> Self {
        let (tx, done) = oneshot::channel();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(());
        });
        Self { handle, done }
    }
}

impl Drop for FinalizeTimer {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!("Aborting pending finalize timer");
            self.handle.abort();
        }
    }
}

pub struct ReviewDialog {
    state: ReviewState,
    consent: bool,
    show_names: bool,
    csv_payload: String,
    filled_rows: Vec<RosterRow>,
    timer: Option<FinalizeTimer>,
}

impl std::fmt::Debug for ReviewDialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewDialog")
            .field("state", &self.state)
            .field("consent", &self.consent)
            .field("filled_rows", &self.filled_rows.len())
            .field("timer", &self.timer.is_some())
            .finish()
    }
}

impl ReviewDialog {
    pub fn new(csv_payload: String, filled_rows: Vec<RosterRow>) -> Self {
        Self {
            state: ReviewState::Reviewing,
            consent: false,
            show_names: false,
            csv_payload,
            filled_rows,
            timer: None,
        }
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    pub fn consent(&self) -> bool {
        self.consent
    }

    pub fn show_names(&self) -> bool {
        self.show_names
    }

    pub fn csv_payload(&self) -> &str {
        &self.csv_payload
    }

    pub fn filled_rows(&self) -> &[RosterRow] {
        &self.filled_rows
    }

    /// Flip the consent checkbox. Only meaningful while reviewing.
    pub fn toggle_consent(&mut self) {
        if self.state == ReviewState::Reviewing {
            self.consent = !self.consent;
        }
    }

    /// Expand or collapse the filled-names list
    pub fn toggle_names_list(&mut self) {
        self.show_names = !self.show_names;
    }

    /// Start the simulated finalize step. Refused without consent.
    pub fn request_finalize(&mut self, delay: Duration) -> Result<()> {
        if self.state != ReviewState::Reviewing {
            return Err(self.invalid("finalize"));
        }
        if !self.consent {
            warn!("Finalize refused: consent not given");
            return Err(WizardError::ConsentRequired);
        }

        info!("Finalizing order review ({:?} delay)", delay);
        self.timer = Some(FinalizeTimer::start(delay));
        self.state = ReviewState::Finalizing;
        Ok(())
    }

    /// Advance to `Completed` if the finalize delay has elapsed.
    /// Returns true when the transition happened on this call.
    pub fn poll_finalize(&mut self) -> bool {
        if self.state != ReviewState::Finalizing {
            return false;
        }
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };

        match timer.done.try_recv() {
            Ok(()) => {
                self.complete();
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
            Err(oneshot::error::TryRecvError::Closed) => {
                warn!("Finalize timer ended without signalling; completing anyway");
                self.complete();
                true
            }
        }
    }

    /// Wait for the finalize delay to elapse
    pub async fn wait_finalized(&mut self) -> Result<()> {
        if self.state != ReviewState::Finalizing {
            return Err(self.invalid("wait for finalize"));
        }
        let timer = self.timer.as_mut().ok_or(WizardError::TimerCancelled)?;
        (&mut timer.done)
            .await
            .map_err(|_| WizardError::TimerCancelled)?;
        self.complete();
        Ok(())
    }

    fn complete(&mut self) {
        self.timer = None;
        self.state = ReviewState::Completed;
        info!("Order review completed");
    }

    /// Dismiss the dialog
    pub fn request_close(&mut self) -> Result<CloseOutcome> {
        match self.state {
            ReviewState::Reviewing => Ok(CloseOutcome::BackToEditing),
            ReviewState::Finalizing => Err(self.invalid("close the dialog")),
            ReviewState::Completed => Ok(CloseOutcome::SessionFinished),
        }
    }

    /// The "finish" action of the completed dialog
    pub fn finish(&mut self) -> Result<CloseOutcome> {
        self.ensure_completed("finish")?;
        Ok(CloseOutcome::SessionFinished)
    }

    /// Write the summary document for the whole roster
    pub fn export_pdf(
        &self,
        metadata: &OrderMetadata,
        rows: &[RosterRow],
        output_dir: &Path,
    ) -> Result<PathBuf> {
        self.ensure_completed("export the PDF")?;
        export::write_pdf(metadata, rows, output_dir)
    }

    /// Write the spreadsheet payload prepared when the review opened
    pub fn export_csv(&self, metadata: &OrderMetadata, output_dir: &Path) -> Result<PathBuf> {
        self.ensure_completed("export the CSV")?;
        export::write_csv(metadata, &self.csv_payload, output_dir)
    }

    fn ensure_completed(&self, action: &'static str) -> Result<()> {
        if self.state == ReviewState::Completed {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> WizardError {
        WizardError::InvalidTransition {
            action,
            state: self.state.as_str(),
        }
    }
}
