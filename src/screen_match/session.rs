use crate::config::MatchConfig;
use crate::diagnostics::DiagnosticsWriter;
use crate::error::{MatchError, MatchResult};
use crate::remote::{FrameSource, PointerInput};
use crate::template_matching::{FindResult, TemplateMatcher};
use image::RgbImage;
use std::path::Path;
use std::time::{Duration, Instant};

/// Load a template image; a missing file is a precondition failure
pub fn load_template(path: &Path) -> MatchResult<RgbImage> {
    if !path.is_file() {
        return Err(MatchError::TemplateMissing {
            path: path.to_path_buf(),
        });
    }
    let image = image::open(path).map_err(|source| MatchError::TemplateLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgb8())
}

/// Image search on a remote screen
pub struct ScreenMatch<S: FrameSource> {
    source: S,
    config: MatchConfig,
    matcher: TemplateMatcher,
    diagnostics: DiagnosticsWriter,
}

impl<S: FrameSource> ScreenMatch<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, MatchConfig::default())
    }

    pub fn with_config(source: S, config: MatchConfig) -> Self {
        Self {
            source,
            matcher: TemplateMatcher::from_config(&config),
            diagnostics: DiagnosticsWriter::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Capture the screen and find every instance of `template` on it.
    ///
    /// Without a template the result only holds the screenshot.
    pub fn find(&mut self, template: Option<&RgbImage>) -> MatchResult<FindResult> {
        let frame = self.source.capture().map_err(MatchError::Capture)?;
        Ok(self.matcher.find(frame, template))
    }

    /// Like [`find`](Self::find), loading the template from `path` first
    pub fn find_by_name(&mut self, path: impl AsRef<Path>) -> MatchResult<FindResult> {
        let template = load_template(&self.config.template_path(path.as_ref()))?;
        self.find(Some(&template))
    }

    /// Expect the image at `path` exactly once on the screen and return its
    /// center.
    ///
    /// Retries with a fresh capture until a single instance shows up or
    /// `timeout` has passed, sleeping `poll_fraction * timeout` between
    /// attempts. A zero timeout means exactly one attempt. On failure the last
    /// attempt is written to a report and [`MatchError::TestFailed`] returned.
    /// A timeout beyond what [`Instant`] can hold never expires.
    pub fn expect_single(
        &mut self,
        path: impl AsRef<Path>,
        timeout: Duration,
    ) -> MatchResult<(u32, u32)> {
        let path = self.config.template_path(path.as_ref());
        let template = load_template(&path)?;
        let poll_fraction = self.config.poll_fraction;
        let pause = Duration::try_from_secs_f64(timeout.as_secs_f64() * poll_fraction).map_err(
            |_| MatchError::InvalidConfig {
                key: "poll_fraction",
                value: poll_fraction.to_string(),
            },
        )?;
        // None: the timeout is too large to represent, keep polling
        let deadline = Instant::now().checked_add(timeout);

        let mut attempt = 0u32;
        let last = loop {
            attempt += 1;
            let result = self.find(Some(&template))?;

            if let Some(found) = result.single() {
                let center = found.centroid();
                log::info!(
                    "✅ {} found at ({},{}) after {} attempt(s)",
                    path.display(),
                    center.0,
                    center.1,
                    attempt
                );
                return Ok(center);
            }

            log::debug!(
                "⏳ Attempt {}: {} box(es) for {}",
                attempt,
                result.boxes().len(),
                path.display()
            );

            if deadline.is_some_and(|d| Instant::now() >= d) {
                break result;
            }
            std::thread::sleep(pause);
        };

        Err(self.diagnostics.fail(last.failure_message(), &last))
    }

    /// Expect the image once on the screen, move the pointer to its center and click
    pub fn click_single<I: PointerInput + ?Sized>(
        &mut self,
        input: &mut I,
        path: impl AsRef<Path>,
        timeout: Duration,
    ) -> MatchResult<(u32, u32)> {
        let (x, y) = self.expect_single(path, timeout)?;
        input.move_to(x, y).map_err(MatchError::Input)?;
        input.click().map_err(MatchError::Input)?;
        Ok((x, y))
    }
}
