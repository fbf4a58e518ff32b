//! Speech through an external text-to-speech command such as `espeak` or
//! `say`. The text is passed as the final argument; one process per
//! utterance.

use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use colore_core::speech::{
    SpeechEvent, SpeechEventKind, SpeechEventSender, SpeechSynthesizer, Utterance, UtteranceId,
};
use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// Environment variable naming the speech command line.
pub const SPEECH_COMMAND_VAR: &str = "COLORE_SPEECH_COMMAND";

struct Playback {
    id: UtteranceId,
    task: AbortHandle,
    events: SpeechEventSender,
}

type ActiveSlot = Arc<Mutex<Option<Playback>>>;

fn lock(slot: &Mutex<Option<Playback>>) -> MutexGuard<'_, Option<Playback>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs a speech command per utterance. Unsupported when no command is
/// configured. Pausing is not possible with a plain process.
pub struct ProcessSynthesizer {
    program: Option<(String, Vec<String>)>,
    active: ActiveSlot,
}

impl std::fmt::Debug for ProcessSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessSynthesizer")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

impl ProcessSynthesizer {
    /// Creates a synthesizer for a whitespace-separated command line. `None`
    /// or a blank line disables speech.
    #[must_use]
    pub fn new(command_line: Option<&str>) -> Self {
        let program = command_line.and_then(|line| {
            let mut parts = line.split_whitespace().map(str::to_owned);
            parts.next().map(|program| (program, parts.collect()))
        });
        Self {
            program,
            active: Arc::new(Mutex::new(None)),
        }
    }

    fn cancel_active(&self) {
        if let Some(playback) = lock(&self.active).take() {
            playback.task.abort();
            let _ = playback.events.send(SpeechEvent::new(
                playback.id,
                SpeechEventKind::Error("interrupted".into()),
            ));
        }
    }
}

async fn play(mut command: Command, id: UtteranceId, events: &SpeechEventSender) -> SpeechEventKind {
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => return SpeechEventKind::Error(format!("could not start speech command: {e}")),
    };
    let _ = events.send(SpeechEvent::new(id, SpeechEventKind::Start));
    match child.wait().await {
        Ok(status) if status.success() => SpeechEventKind::End,
        Ok(status) => SpeechEventKind::Error(format!("speech command exited with {status}")),
        Err(e) => SpeechEventKind::Error(e.to_string()),
    }
}

impl SpeechSynthesizer for ProcessSynthesizer {
    fn is_supported(&self) -> bool {
        self.program.is_some()
    }

    fn speak(&self, utterance: Utterance, events: SpeechEventSender) {
        let id = utterance.id;
        let Some((program, args)) = &self.program else {
            let _ = events.send(SpeechEvent::new(
                id,
                SpeechEventKind::Error("no speech command configured".into()),
            ));
            return;
        };
        let Ok(runtime) = Handle::try_current() else {
            warn!(utterance = %id, "speech requested outside the async runtime");
            let _ = events.send(SpeechEvent::new(
                id,
                SpeechEventKind::Error("no async runtime".into()),
            ));
            return;
        };

        self.cancel_active();

        let mut command = Command::new(program);
        command
            .args(args)
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        debug!(utterance = %id, program, rate = utterance.options.rate, "starting speech command");

        let mut slot = lock(&self.active);
        let active = Arc::clone(&self.active);
        let task_events = events.clone();
        let task = runtime.spawn(async move {
            let outcome = play(command, id, &task_events).await;
            {
                let mut slot = lock(&active);
                if slot.as_ref().is_some_and(|p| p.id == id) {
                    *slot = None;
                }
            }
            let _ = task_events.send(SpeechEvent::new(id, outcome));
        });
        *slot = Some(Playback {
            id,
            task: task.abort_handle(),
            events,
        });
    }

    fn cancel(&self) {
        self.cancel_active();
    }

    fn pause(&self) {
        debug!("the speech command cannot be paused");
    }

    fn resume(&self) {
        debug!("the speech command cannot be resumed");
    }

    fn is_speaking(&self) -> bool {
        lock(&self.active).is_some()
    }

    fn is_paused(&self) -> bool {
        false
    }
}
