//! # xlgantt-render
//!
//! Timeline building and rendering backends for xlgantt.
//!
//! This crate provides:
//! - The timeline builder: records, releases and filters in, groups and items out
//! - An HTML renderer embedding the vis-timeline widget
//! - Starter xlsx workbooks for new plans
//!
//! ## Example
//!
//! ```rust,ignore
//! use xlgantt_core::{CategoryStyles, DisplayOptions, FilterSet, TimelineConfig, TimelineRenderer};
//! use xlgantt_render::{build_timeline, VisTimelineRenderer};
//!
//! let config = TimelineConfig::default();
//! let timeline = build_timeline(&tasks, &releases, &FilterSet::default(), &config);
//!
//! let renderer = VisTimelineRenderer::new().title("Q1 plan");
//! let widget = renderer.mount("timeline", &timeline, &DisplayOptions::default(), &config.colors)?;
//! std::fs::write("plan.html", widget.html().unwrap_or_default())?;
//! ```

pub mod template;
pub mod timeline;
pub mod vis;

pub use template::TemplateWriter;
pub use timeline::{build_timeline, format_date, truncate_name, DEADLINE_MARKER, RELEASES_LABEL};
pub use vis::{HtmlTimeline, PageTheme, VisTimelineRenderer};
