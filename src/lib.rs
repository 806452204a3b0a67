//! # docs-pdf
//!
//! Settings resolution for exporting a documentation site to a single PDF.
//! The documentation generator hands over its site-wide settings and the
//! exporter's own `[pdf]` table; this crate turns them into one immutable
//! [`options::ResolvedOptions`] value that the rendering stages read.
//!
//! # Resolution
//!
//! ```text
//! docs-pdf.toml  →  HostConfig { site, pdf }  →  resolve()  →  ResolvedOptions
//!                    (defaults, validation)       (fallbacks, logo lookup,
//!                                                  renderer, templates)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `docs-pdf.toml` loading, merging over stock defaults, validation, `enabled_if_env` gate |
//! | [`options`] | The resolver and the [`ResolvedOptions`](options::ResolvedOptions) it produces |
//! | [`normalize`] | HTML stripping for author, copyright and TOC title |
//! | [`reference`] | Cover logo lookup across the template, theme, docs and working directories |
//! | [`renderer`] | Optional headless-browser JS rendering behind the [`RendererLauncher`](renderer::RendererLauncher) trait |
//! | [`template`] | Cover page and stylesheet, built-in (Maud) or user-supplied |
//! | [`output`] | CLI formatting of resolved options |
//!
//! # Design Decisions
//!
//! ## Resolve Once
//!
//! Every default and fallback is applied inside [`options::resolve`]. The
//! resulting value has no setters, so later stages never see a half-resolved
//! setting and never need to repeat a fallback.
//!
//! ## Cover Fields Travel Together
//!
//! Title, subtitle and logo only make sense with a cover page. They live in
//! an `Option<Cover>`, so "cover disabled but a title is set" cannot be
//! represented.
//!
//! ## Injected Browser
//!
//! Starting Chrome is the only side effect of resolution besides file
//! probing. The launcher is a parameter, so dry runs and tests pass
//! [`renderer::NoopLauncher`] or a mock and never spawn a process.

pub mod config;
pub mod normalize;
pub mod options;
pub mod output;
pub mod reference;
pub mod renderer;
pub mod template;
