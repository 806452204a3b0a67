//! JavaScript rendering backend.
//!
//! Pages that build their content client-side (diagrams, tabbed code blocks,
//! search widgets) must be run through a browser before the PDF engine sees
//! them. The [`RendererLauncher`] trait starts a backend once per build and
//! hands back a [`JsRenderer`] that turns HTML into the post-script DOM.
//!
//! The production implementation is [`HeadlessChromeLauncher`], which drives
//! a local Chrome/Chromium through `headless_chrome`. [`NoopLauncher`] yields
//! a renderer that returns its input unchanged, for dry runs and tests.

use headless_chrome::{Browser, LaunchOptions};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no such headless Chrome program or not executable: \"{0}\"")]
    ProgramNotFound(String),
    #[error("browser error: {0}")]
    Browser(String),
}

/// A started rendering backend.
pub trait JsRenderer: Send {
    /// Execute the page's scripts and return the resulting DOM as HTML.
    fn render(&self, html: &str) -> Result<String, RenderError>;

    /// False for stand-ins that never started a real browser.
    fn is_live(&self) -> bool {
        true
    }
}

/// Starts a rendering backend from the configured program path.
pub trait RendererLauncher {
    fn start(&self, program_path: &str) -> Result<Box<dyn JsRenderer>, RenderError>;
}

// =============================================================================
// Headless Chrome
// =============================================================================

/// Launches a headless Chrome/Chromium binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessChromeLauncher;

impl RendererLauncher for HeadlessChromeLauncher {
    fn start(&self, program_path: &str) -> Result<Box<dyn JsRenderer>, RenderError> {
        let program = locate_program(program_path)
            .ok_or_else(|| RenderError::ProgramNotFound(program_path.to_string()))?;
        tracing::debug!(program = %program.display(), "launching headless Chrome");

        let options = LaunchOptions {
            path: Some(program),
            sandbox: false,
            args: vec![
                OsStr::new("--disable-gpu"),
                OsStr::new("--allow-file-access-from-files"),
                OsStr::new("--run-all-compositor-stages-before-draw"),
            ],
            ..Default::default()
        };
        let browser = Browser::new(options).map_err(|e| RenderError::Browser(e.to_string()))?;
        Ok(Box::new(HeadlessChrome { browser }))
    }
}

/// A running headless browser. The process exits when this is dropped.
pub struct HeadlessChrome {
    browser: Browser,
}

impl JsRenderer for HeadlessChrome {
    fn render(&self, html: &str) -> Result<String, RenderError> {
        let mut page = tempfile::Builder::new()
            .prefix("docs-pdf-")
            .suffix(".html")
            .tempfile()?;
        page.write_all(html.as_bytes())?;
        page.flush()?;

        let url = Url::from_file_path(page.path())
            .map_err(|()| RenderError::Browser(format!("bad page path {}", page.path().display())))?;

        tracing::info!("rendering on headless Chrome (executing JS)");
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| RenderError::Browser(e.to_string()))?;
        tab.navigate_to(url.as_str())
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| RenderError::Browser(e.to_string()))?;
        let content = tab
            .get_content()
            .map_err(|e| RenderError::Browser(e.to_string()))?;

        if let Err(e) = tab.close(true) {
            tracing::debug!("failed to close tab: {e}");
        }
        Ok(content)
    }
}

/// Find an executable: a path with separators must exist as a file, a bare
/// name is looked up on `PATH`.
fn locate_program(program: &str) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }
    let candidate = Path::new(program);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let search_path = std::env::var_os("PATH")?;
    std::env::split_paths(&search_path)
        .map(|dir| dir.join(program))
        .find(|path| path.is_file())
}

// =============================================================================
// No-op backend
// =============================================================================

/// Launcher whose renderer returns HTML unchanged. Never spawns a process.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLauncher;

impl RendererLauncher for NoopLauncher {
    fn start(&self, program_path: &str) -> Result<Box<dyn JsRenderer>, RenderError> {
        tracing::debug!(program = program_path, "JS rendering disabled for this run");
        Ok(Box::new(PassthroughRenderer))
    }
}

/// Renderer that performs no script execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRenderer;

impl JsRenderer for PassthroughRenderer {
    fn render(&self, html: &str) -> Result<String, RenderError> {
        Ok(html.to_string())
    }

    fn is_live(&self) -> bool {
        false
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock launcher that records the program paths it was started with.
    #[derive(Default, Clone)]
    pub struct MockLauncher {
        pub started: Arc<Mutex<Vec<String>>>,
        pub fail: bool,
        pub render_fails: bool,
    }

    impl MockLauncher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn with_broken_renderer() -> Self {
            Self {
                render_fails: true,
                ..Self::default()
            }
        }

        pub fn started(&self) -> Vec<String> {
            self.started.lock().unwrap().clone()
        }
    }

    impl RendererLauncher for MockLauncher {
        fn start(&self, program_path: &str) -> Result<Box<dyn JsRenderer>, RenderError> {
            self.started.lock().unwrap().push(program_path.to_string());
            if self.fail {
                return Err(RenderError::ProgramNotFound(program_path.to_string()));
            }
            Ok(Box::new(MockRenderer {
                fails: self.render_fails,
            }))
        }
    }

    /// Wraps the input in a marker element so tests can see it ran.
    pub struct MockRenderer {
        fails: bool,
    }

    impl JsRenderer for MockRenderer {
        fn render(&self, html: &str) -> Result<String, RenderError> {
            if self.fails {
                return Err(RenderError::Browser("tab crashed".to_string()));
            }
            Ok(format!("<div data-rendered>{html}</div>"))
        }
    }

    #[test]
    fn mock_records_start() {
        let launcher = MockLauncher::new();
        let renderer = launcher.start("/usr/bin/chromium").unwrap();
        assert_eq!(launcher.started(), vec!["/usr/bin/chromium"]);
        assert_eq!(
            renderer.render("<p>x</p>").unwrap(),
            "<div data-rendered><p>x</p></div>"
        );
    }

    #[test]
    fn noop_renderer_passes_through() {
        let renderer = NoopLauncher.start("chromium-browser").unwrap();
        assert_eq!(renderer.render("<p>x</p>").unwrap(), "<p>x</p>");
    }

    #[test]
    fn chrome_launcher_rejects_missing_program() {
        let err = HeadlessChromeLauncher
            .start("/nonexistent/bin/chromium-browser-for-tests")
            .err()
            .unwrap();
        assert!(matches!(err, RenderError::ProgramNotFound(_)));
        assert!(err.to_string().contains("chromium-browser-for-tests"));
    }

    #[test]
    fn chrome_launcher_rejects_empty_program() {
        assert!(matches!(
            HeadlessChromeLauncher.start("").err(),
            Some(RenderError::ProgramNotFound(_))
        ));
    }

    #[test]
    fn locate_program_accepts_existing_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let program = tmp.path().join("chrome");
        std::fs::write(&program, b"#!/bin/sh\n").unwrap();
        assert_eq!(locate_program(program.to_str().unwrap()), Some(program));
    }

    #[test]
    fn locate_program_unknown_bare_name() {
        assert_eq!(locate_program("definitely-not-a-browser-7f3a"), None);
    }
}
