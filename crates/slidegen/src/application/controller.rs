//! Form Controller - Owns the submission lifecycle
//!
//! Validates the prompt, performs one generation round trip and hands the
//! resulting artifact to the downloader, rendering every phase through the
//! bound [`FormView`].

use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::config::ControllerConfig;
use crate::domain::entities::{
    char_count_label, DownloadedFile, GeneratedArtifact, HealthStatus, PromptText,
};
use crate::domain::errors::FormError;
use crate::domain::value_objects::{EventReceiver, FormEvent, StatusDisplay, SubmissionState};
use crate::ports::{ArtifactDownloader, FormView, GenerationService};

/// Result of a `submit` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request was already in flight
    Ignored,
    Completed(DownloadedFile),
    Failed(FormError),
}

impl SubmitOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

#[derive(Debug, Default)]
struct FormState {
    submission: SubmissionState,
    /// Bumped on every transition; stale success timers compare against it
    epoch: u64,
}

fn lock(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Set and render under the caller's lock so renders are never reordered
fn apply(state: &mut FormState, view: &dyn FormView, next: SubmissionState) -> u64 {
    debug!("Submission state: {} -> {}", state.submission, next);
    state.submission = next;
    state.epoch += 1;
    view.render(&StatusDisplay::render(&state.submission));
    state.epoch
}

pub struct FormController {
    view: Arc<dyn FormView>,
    generator: Arc<dyn GenerationService>,
    downloader: Arc<dyn ArtifactDownloader>,
    config: ControllerConfig,
    state: Arc<Mutex<FormState>>,
}

impl FormController {
    pub fn new(
        view: Arc<dyn FormView>,
        generator: Arc<dyn GenerationService>,
        downloader: Arc<dyn ArtifactDownloader>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            view,
            generator,
            downloader,
            config,
            state: Arc::new(Mutex::new(FormState::default())),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SubmissionState {
        lock(&self.state).submission.clone()
    }

    /// Bind to the view, show the idle form and check the backend.
    ///
    /// Returns the receiver to drive with [`run`](Self::run).
    pub async fn init(&self) -> EventReceiver {
        debug!("Initializing form controller");
        let (tx, rx) = mpsc::unbounded_channel();
        self.view.bind(tx);

        {
            let mut state = lock(&self.state);
            apply(&mut state, self.view.as_ref(), SubmissionState::Idle);
        }
        self.view.focus_prompt();

        if self.config.check_health_on_init {
            self.check_health().await;
        }

        debug!("Initialization complete");
        rx
    }

    /// Best-effort connectivity check. Failures are logged, never surfaced.
    pub async fn check_health(&self) -> Option<HealthStatus> {
        match self.generator.health().await {
            Ok(health) => {
                info!("Backend is running at {}: {}", self.generator.endpoint(), health);
                Some(health)
            }
            Err(e) => {
                warn!(
                    "Backend health check failed for {}: {}",
                    self.generator.endpoint(),
                    e
                );
                None
            }
        }
    }

    /// Dispatch view events until `Close` or the channel is dropped.
    ///
    /// `Loading` is entered inline, in event order; only the network and
    /// download tail is spawned, so later events (including an ignored
    /// second submit) keep flowing while a request is in flight.
    pub async fn run(self: Arc<Self>, mut events: EventReceiver) {
        let mut submissions = JoinSet::new();

        while let Some(event) = events.recv().await {
            while submissions.try_join_next().is_some() {}

            match event {
                FormEvent::InputChanged(text) => self.on_input_changed(&text),
                FormEvent::Clear => self.clear(),
                FormEvent::Submit(text) => {
                    if let Ok(prompt) = self.begin_submit(&text) {
                        let controller = Arc::clone(&self);
                        submissions.spawn(async move { controller.finish_submit(prompt).await });
                    }
                }
                FormEvent::Close => break,
            }
        }

        while submissions.join_next().await.is_some() {}
        debug!("Form event loop finished");
    }

    /// Presentational feedback only: hide messages, count, resize
    pub fn on_input_changed(&self, text: &str) {
        self.hide_messages();
        self.view.set_char_count(&char_count_label(text));

        let height = self.view.content_height().min(self.config.max_input_height);
        self.view.set_input_height(Some(height));
    }

    pub fn clear(&self) {
        debug!("Clearing form");
        self.view.set_prompt("");
        self.view.set_input_height(None);
        self.view.set_char_count(&char_count_label(""));
        self.hide_messages();
        self.view.focus_prompt();
        self.view.pulse_prompt();
    }

    /// Return to `Idle` unless a request is in flight
    fn hide_messages(&self) {
        let mut state = lock(&self.state);
        if state.submission.is_loading() || state.submission == SubmissionState::Idle {
            return;
        }
        apply(&mut state, self.view.as_ref(), SubmissionState::Idle);
    }

    pub async fn submit(&self, raw_prompt: &str) -> SubmitOutcome {
        match self.begin_submit(raw_prompt) {
            Ok(prompt) => self.finish_submit(prompt).await,
            Err(outcome) => outcome,
        }
    }

    /// Synchronous half of `submit`: validate and enter `Loading` under the lock.
    ///
    /// `Err` carries the final outcome when no request should be made.
    pub fn begin_submit(&self, raw_prompt: &str) -> Result<PromptText, SubmitOutcome> {
        let mut state = lock(&self.state);
        if state.submission.is_loading() {
            drop(state);
            debug!("Submit ignored: a generation is already in flight");
            self.view.show_busy();
            return Err(SubmitOutcome::Ignored);
        }

        match PromptText::parse_with_min(raw_prompt, self.config.min_prompt_chars) {
            Ok(prompt) => {
                apply(&mut state, self.view.as_ref(), SubmissionState::Loading);
                Ok(prompt)
            }
            Err(e) => {
                let err = FormError::from(e);
                apply(
                    &mut state,
                    self.view.as_ref(),
                    SubmissionState::Error(err.user_message()),
                );
                drop(state);
                self.view.focus_prompt();
                Err(SubmitOutcome::Failed(err))
            }
        }
    }

    /// Network and download tail of a submission already in `Loading`
    async fn finish_submit(&self, prompt: PromptText) -> SubmitOutcome {
        debug!(
            "Sending prompt ({} chars) to {}",
            prompt.as_str().chars().count(),
            self.generator.endpoint()
        );

        match self.generate_and_download(&prompt).await {
            Ok(file) => {
                info!("Presentation saved: {} ({} bytes)", file.file_name, file.size);
                let epoch = {
                    let mut state = lock(&self.state);
                    apply(&mut state, self.view.as_ref(), SubmissionState::Success)
                };
                self.schedule_success_reset(epoch);

                if self.config.offer_reset_after_success && self.view.confirm_new_submission() {
                    self.clear();
                }

                SubmitOutcome::Completed(file)
            }
            Err(err) => {
                error!("Generation failed: {}", err);
                let mut state = lock(&self.state);
                apply(
                    &mut state,
                    self.view.as_ref(),
                    SubmissionState::Error(err.user_message()),
                );
                SubmitOutcome::Failed(err)
            }
        }
    }

    async fn generate_and_download(&self, prompt: &PromptText) -> Result<DownloadedFile, FormError> {
        let bytes = self.generator.generate(prompt).await?;
        debug!("Received artifact: {} bytes", bytes.len());

        let artifact = GeneratedArtifact::new(bytes, Utc::now());
        self.downloader.download(artifact).await
    }

    fn schedule_success_reset(&self, epoch: u64) {
        let state = Arc::clone(&self.state);
        let view = Arc::clone(&self.view);
        let delay = self.config.success_display;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = lock(&state);
            if state.epoch == epoch {
                apply(&mut state, view.as_ref(), SubmissionState::Idle);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::GENERIC_FAILURE_MESSAGE;
    use crate::domain::value_objects::EventSender;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    const VALID_PROMPT: &str = "Make a 5-slide pitch deck about solar energy";

    #[derive(Default)]
    struct RecordingView {
        renders: Mutex<Vec<StatusDisplay>>,
        char_counts: Mutex<Vec<String>>,
        heights: Mutex<Vec<Option<u32>>>,
        prompt: Mutex<Option<String>>,
        focus_count: AtomicUsize,
        pulse_count: AtomicUsize,
        busy_count: AtomicUsize,
        content_height: u32,
        confirm_answer: bool,
        sender: Mutex<Option<EventSender>>,
    }

    impl RecordingView {
        fn last_render(&self) -> StatusDisplay {
            self.renders.lock().unwrap().last().cloned().unwrap()
        }

        fn sender(&self) -> EventSender {
            self.sender.lock().unwrap().clone().unwrap()
        }
    }

    impl FormView for RecordingView {
        fn bind(&self, events: EventSender) {
            *self.sender.lock().unwrap() = Some(events);
        }

        fn render(&self, display: &StatusDisplay) {
            self.renders.lock().unwrap().push(display.clone());
        }

        fn set_char_count(&self, label: &str) {
            self.char_counts.lock().unwrap().push(label.to_string());
        }

        fn content_height(&self) -> u32 {
            self.content_height
        }

        fn set_input_height(&self, height: Option<u32>) {
            self.heights.lock().unwrap().push(height);
        }

        fn set_prompt(&self, text: &str) {
            *self.prompt.lock().unwrap() = Some(text.to_string());
        }

        fn focus_prompt(&self) {
            self.focus_count.fetch_add(1, Ordering::SeqCst);
        }

        fn pulse_prompt(&self) {
            self.pulse_count.fetch_add(1, Ordering::SeqCst);
        }

        fn show_busy(&self) {
            self.busy_count.fetch_add(1, Ordering::SeqCst);
        }

        fn confirm_new_submission(&self) -> bool {
            self.confirm_answer
        }
    }

    #[derive(Default)]
    struct ScriptedGenerator {
        responses: Mutex<VecDeque<Result<Vec<u8>, FormError>>>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
        healthy: bool,
    }

    impl ScriptedGenerator {
        fn replying(response: Result<Vec<u8>, FormError>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from([response])),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationService for ScriptedGenerator {
        async fn generate(&self, prompt: &PromptText) -> Result<Vec<u8>, FormError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.as_str().to_string());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(b"PK\x03\x04".to_vec()))
        }

        async fn health(&self) -> Result<HealthStatus, FormError> {
            if self.healthy {
                Ok(HealthStatus {
                    status: Some("healthy".to_string()),
                    message: None,
                })
            } else {
                Err(FormError::transport(self.endpoint(), "connection refused"))
            }
        }

        fn endpoint(&self) -> &str {
            "http://localhost:5009"
        }
    }

    #[derive(Default)]
    struct MemoryDownloader {
        saved: Mutex<Vec<GeneratedArtifact>>,
        failure: Option<String>,
    }

    #[async_trait]
    impl ArtifactDownloader for MemoryDownloader {
        async fn download(&self, artifact: GeneratedArtifact) -> Result<DownloadedFile, FormError> {
            if let Some(reason) = &self.failure {
                return Err(FormError::Download(reason.clone()));
            }
            let file = DownloadedFile {
                file_name: artifact.file_name.clone(),
                location: PathBuf::from(&artifact.file_name),
                size: artifact.len(),
            };
            self.saved.lock().unwrap().push(artifact);
            Ok(file)
        }
    }

    struct Harness {
        view: Arc<RecordingView>,
        generator: Arc<ScriptedGenerator>,
        downloader: Arc<MemoryDownloader>,
        controller: Arc<FormController>,
    }

    fn harness_with(
        view: RecordingView,
        generator: ScriptedGenerator,
        downloader: MemoryDownloader,
        config: ControllerConfig,
    ) -> Harness {
        let view = Arc::new(view);
        let generator = Arc::new(generator);
        let downloader = Arc::new(downloader);
        let controller = Arc::new(FormController::new(
            view.clone(),
            generator.clone(),
            downloader.clone(),
            config,
        ));
        Harness {
            view,
            generator,
            downloader,
            controller,
        }
    }

    fn harness(generator: ScriptedGenerator) -> Harness {
        harness_with(
            RecordingView::default(),
            generator,
            MemoryDownloader::default(),
            ControllerConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_short_prompt_never_reaches_network() {
        let h = harness(ScriptedGenerator::default());

        for raw in ["hi", "   short  ", "123456789"] {
            let outcome = h.controller.submit(raw).await;
            assert!(matches!(outcome, SubmitOutcome::Failed(ref e) if e.is_validation()));
        }

        assert_eq!(h.generator.calls(), 0);
        assert_eq!(
            h.controller.state(),
            SubmissionState::Error(
                "Please provide a more detailed prompt (at least 10 characters)".to_string()
            )
        );
        assert!(h.view.focus_count.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_empty_prompt_requires_input() {
        let h = harness(ScriptedGenerator::default());

        h.controller.submit("   ").await;

        assert_eq!(h.generator.calls(), 0);
        assert_eq!(
            h.view.last_render().error_message.as_deref(),
            Some("Please enter a prompt for your presentation")
        );
    }

    #[tokio::test]
    async fn test_successful_generation_downloads_once() {
        let h = harness(ScriptedGenerator::replying(Ok(b"PK\x03\x04pptx-bytes".to_vec())));

        let outcome = h.controller.submit(&format!("  {}  ", VALID_PROMPT)).await;

        let SubmitOutcome::Completed(file) = outcome else {
            panic!("expected completed outcome");
        };
        assert!(file.file_name.starts_with("Presentation_"));
        assert!(file.file_name.ends_with(".pptx"));
        assert_eq!(file.size, 14);

        assert_eq!(h.generator.calls(), 1);
        assert_eq!(*h.generator.prompts.lock().unwrap(), vec![VALID_PROMPT.to_string()]);
        assert_eq!(h.downloader.saved.lock().unwrap().len(), 1);
        assert_eq!(h.controller.state(), SubmissionState::Success);

        let renders = h.view.renders.lock().unwrap();
        let loading = &renders[renders.len() - 2];
        assert!(loading.status_visible);
        assert!(!loading.submit.enabled);
        assert!(renders.last().unwrap().success_visible);
        assert!(renders.last().unwrap().submit.enabled);
    }

    #[tokio::test]
    async fn test_server_error_message_is_displayed() {
        let h = harness(ScriptedGenerator::replying(Err(FormError::application(
            500,
            Some("Template not found".to_string()),
        ))));

        h.controller.submit(VALID_PROMPT).await;

        assert_eq!(
            h.controller.state(),
            SubmissionState::Error("Template not found".to_string())
        );
        assert!(h.downloader.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_error_body_uses_generic_message() {
        let h = harness(ScriptedGenerator::replying(Err(FormError::Parse {
            status: 502,
            reason: "expected value".to_string(),
        })));

        h.controller.submit(VALID_PROMPT).await;

        assert_eq!(
            h.controller.state(),
            SubmissionState::Error(GENERIC_FAILURE_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_form_usable() {
        let h = harness(ScriptedGenerator::replying(Err(FormError::transport(
            "http://localhost:5009",
            "connection refused",
        ))));

        h.controller.submit(VALID_PROMPT).await;

        let display = h.view.last_render();
        assert!(display.error_visible);
        assert!(display.submit.enabled);
        assert!(display
            .error_message
            .unwrap()
            .starts_with("Cannot connect to server."));

        // Next submission goes through
        let outcome = h.controller.submit(VALID_PROMPT).await;
        assert!(outcome.is_completed());
        assert_eq!(h.generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_download_failure_is_reported() {
        let h = harness_with(
            RecordingView::default(),
            ScriptedGenerator::default(),
            MemoryDownloader {
                failure: Some("disk full".to_string()),
                ..Default::default()
            },
            ControllerConfig::default(),
        );

        h.controller.submit(VALID_PROMPT).await;

        assert_eq!(
            h.controller.state(),
            SubmissionState::Error("Failed to save presentation: disk full".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_reverts_to_idle_after_delay() {
        let h = harness(ScriptedGenerator::default());

        h.controller.submit(VALID_PROMPT).await;
        assert_eq!(h.controller.state(), SubmissionState::Success);

        tokio::time::sleep(Duration::from_millis(4900)).await;
        assert_eq!(h.controller.state(), SubmissionState::Success);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(h.controller.state(), SubmissionState::Idle);
        assert_eq!(h.view.last_render().visible_regions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_success_timer_does_not_clobber_newer_state() {
        let h = harness(ScriptedGenerator::default());

        h.controller.submit(VALID_PROMPT).await;
        h.controller.on_input_changed("hi");
        h.controller.submit("hi").await;
        assert!(h.controller.state().error_message().is_some());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(h.controller.state().error_message().is_some());
    }

    #[tokio::test]
    async fn test_submit_while_loading_is_ignored() {
        let gate = Arc::new(Notify::new());
        let h = harness(ScriptedGenerator {
            gate: Some(gate.clone()),
            ..Default::default()
        });

        let first = {
            let controller = h.controller.clone();
            tokio::spawn(async move { controller.submit(VALID_PROMPT).await })
        };
        while !h.controller.state().is_loading() {
            tokio::task::yield_now().await;
        }

        assert_eq!(h.controller.submit(VALID_PROMPT).await, SubmitOutcome::Ignored);
        assert_eq!(h.view.busy_count.load(Ordering::SeqCst), 1);

        // Typing or clearing mid-flight does not unlock the form
        h.controller.on_input_changed("more text");
        h.controller.clear();
        assert!(h.controller.state().is_loading());

        gate.notify_one();
        assert!(first.await.unwrap().is_completed());
        assert_eq!(h.generator.calls(), 1);
        assert_eq!(h.downloader.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_input_change_updates_count_and_caps_height() {
        let h = harness_with(
            RecordingView {
                content_height: 900,
                ..Default::default()
            },
            ScriptedGenerator::default(),
            MemoryDownloader::default(),
            ControllerConfig::default(),
        );

        h.controller.submit("hi").await;
        h.controller.on_input_changed("hello world");

        assert_eq!(h.controller.state(), SubmissionState::Idle);
        assert_eq!(
            h.view.char_counts.lock().unwrap().last().map(String::as_str),
            Some("11 characters")
        );
        assert_eq!(*h.view.heights.lock().unwrap(), vec![Some(400)]);
        assert_eq!(h.generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_clear_resets_form() {
        let h = harness(ScriptedGenerator::default());

        h.controller.submit("short").await;
        h.controller.clear();

        assert_eq!(h.controller.state(), SubmissionState::Idle);
        assert_eq!(h.view.prompt.lock().unwrap().as_deref(), Some(""));
        assert_eq!(
            h.view.char_counts.lock().unwrap().last().map(String::as_str),
            Some("0 characters")
        );
        assert_eq!(h.view.heights.lock().unwrap().last(), Some(&None));
        assert_eq!(h.view.pulse_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reset_offer_clears_on_confirmation() {
        let h = harness_with(
            RecordingView {
                confirm_answer: true,
                ..Default::default()
            },
            ScriptedGenerator::default(),
            MemoryDownloader::default(),
            ControllerConfig::default().with_reset_offer(true),
        );

        let outcome = h.controller.submit(VALID_PROMPT).await;

        assert!(outcome.is_completed());
        assert_eq!(h.view.prompt.lock().unwrap().as_deref(), Some(""));
        assert_eq!(h.controller.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_failed_health_check_is_not_fatal() {
        let h = harness(ScriptedGenerator::default());

        let _events = h.controller.init().await;

        assert!(h.controller.check_health().await.is_none());
        assert_eq!(h.controller.state(), SubmissionState::Idle);
        assert_eq!(h.view.focus_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_event_loop_dispatches_bound_events() {
        let h = harness(ScriptedGenerator {
            healthy: true,
            ..Default::default()
        });

        let events = h.controller.init().await;
        let runner = tokio::spawn(h.controller.clone().run(events));

        let sender = h.view.sender();
        sender
            .send(FormEvent::InputChanged(VALID_PROMPT.to_string()))
            .unwrap();
        sender.send(FormEvent::Submit(VALID_PROMPT.to_string())).unwrap();
        sender.send(FormEvent::Close).unwrap();

        runner.await.unwrap();

        assert_eq!(h.generator.calls(), 1);
        assert_eq!(h.downloader.saved.lock().unwrap().len(), 1);
        assert_eq!(
            h.view.char_counts.lock().unwrap().first().map(String::as_str),
            Some("44 characters")
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_queued_submits_honour_event_order() {
        for _ in 0..50 {
            let gate = Arc::new(Notify::new());
            let h = harness_with(
                RecordingView::default(),
                ScriptedGenerator {
                    gate: Some(gate.clone()),
                    ..Default::default()
                },
                MemoryDownloader::default(),
                ControllerConfig::default().with_health_check(false),
            );

            let events = h.controller.init().await;
            let sender = h.view.sender();
            sender
                .send(FormEvent::Submit("first deck about solar energy".to_string()))
                .unwrap();
            sender
                .send(FormEvent::Submit("second deck about wind power".to_string()))
                .unwrap();
            sender.send(FormEvent::Close).unwrap();

            let runner = tokio::spawn(h.controller.clone().run(events));
            // Hold the first request open until the second submit was handled
            while h.view.busy_count.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
            gate.notify_one();
            runner.await.unwrap();

            assert_eq!(
                *h.generator.prompts.lock().unwrap(),
                vec!["first deck about solar energy".to_string()]
            );
            assert_eq!(h.view.busy_count.load(Ordering::SeqCst), 1);
            assert_eq!(h.controller.state(), SubmissionState::Success);
        }
    }
}
