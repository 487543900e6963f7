//! # xlgantt-viewer
//!
//! Keeps a mounted timeline in step with its inputs.
//!
//! A [`GanttViewer`] owns the loaded task and release records, the active
//! filters and the widget produced by a [`TimelineRenderer`]. Every change
//! rebuilds the timeline from scratch and replaces the widget.
//!
//! ## Example
//!
//! ```rust,ignore
//! use xlgantt_core::Config;
//! use xlgantt_render::VisTimelineRenderer;
//! use xlgantt_viewer::{GanttViewer, Source};
//!
//! let mut viewer = GanttViewer::new(VisTimelineRenderer::new(), "timeline", Config::default());
//! viewer.load_tasks(Source::parse("plan.xlsx")).await?;
//! viewer.load_releases(Source::parse("https://example.com/releases.xlsx")).await?;
//! viewer.set_show_releases(true)?;
//! ```

pub mod source;

pub use source::Source;

use thiserror::Error;
use xlgantt_core::{
    unique_values, ColumnMap, Config, DisplayOptions, FilterSet, ReleaseRecord, RenderError,
    TaskField, TaskRecord, Timeline, TimelineConfig, TimelineRenderer, TimelineWidget,
};
use xlgantt_parser::{parse_releases, parse_tasks, ParseError};
use xlgantt_render::{build_timeline, VisTimelineRenderer};

/// Viewer errors
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Viewer has been destroyed")]
    Destroyed,
}

/// Stateful Gantt view over one renderer and container
pub struct GanttViewer<R: TimelineRenderer> {
    renderer: R,
    container: String,
    columns: ColumnMap,
    config: TimelineConfig,
    options: DisplayOptions,
    client: reqwest::Client,
    tasks: Vec<TaskRecord>,
    releases: Vec<ReleaseRecord>,
    filters: FilterSet,
    timeline: Timeline,
    widget: Option<R::Widget>,
    loaded: bool,
    destroyed: bool,
}

impl GanttViewer<VisTimelineRenderer> {
    /// HTML viewer with the label column width taken from `config.timeline`
    pub fn vis(container: impl Into<String>, config: Config) -> Self {
        let renderer = VisTimelineRenderer::new().label_width(config.timeline.label_width.clone());
        Self::new(renderer, container, config)
    }
}

impl<R: TimelineRenderer> GanttViewer<R> {
    /// Colors reach the renderer on every mount. Renderer-specific settings
    /// such as `timeline.label_width` must already be set on `renderer`;
    /// [`GanttViewer::vis`] does that for the HTML renderer.
    pub fn new(renderer: R, container: impl Into<String>, config: Config) -> Self {
        Self {
            renderer,
            container: container.into(),
            columns: config.columns,
            config: config.timeline,
            options: DisplayOptions::default(),
            client: reqwest::Client::new(),
            tasks: Vec::new(),
            releases: Vec::new(),
            filters: FilterSet::default(),
            timeline: Timeline::default(),
            widget: None,
            loaded: false,
            destroyed: false,
        }
    }

    /// Widget options used for every mount
    pub fn with_options(mut self, options: DisplayOptions) -> Self {
        self.options = options;
        self
    }

    /// HTTP client used for `Source::Url`
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Read, parse and show a task workbook
    ///
    /// The previous records and widget stay in place when any step fails.
    pub async fn load_tasks(&mut self, source: Source) -> Result<(), ViewerError> {
        self.ensure_active()?;
        tracing::info!(%source, "loading tasks");
        let bytes = self.read(&source).await?;
        self.load_tasks_bytes(&bytes)?;
        tracing::info!(%source, tasks = self.tasks.len(), "loaded tasks");
        Ok(())
    }

    /// Read, parse and show a release workbook
    pub async fn load_releases(&mut self, source: Source) -> Result<(), ViewerError> {
        self.ensure_active()?;
        tracing::info!(%source, "loading releases");
        let bytes = self.read(&source).await?;
        self.load_releases_bytes(&bytes)?;
        tracing::info!(%source, releases = self.releases.len(), "loaded releases");
        Ok(())
    }

    pub fn load_tasks_bytes(&mut self, bytes: &[u8]) -> Result<(), ViewerError> {
        self.ensure_active()?;
        let tasks = parse_tasks(bytes, &self.columns)?;
        let (timeline, widget) = self.render(&tasks, &self.releases, &self.filters, &self.config)?;
        self.tasks = tasks;
        self.commit(timeline, widget);
        Ok(())
    }

    pub fn load_releases_bytes(&mut self, bytes: &[u8]) -> Result<(), ViewerError> {
        self.ensure_active()?;
        let releases = parse_releases(bytes, &self.columns)?;
        let (timeline, widget) = self.render(&self.tasks, &releases, &self.filters, &self.config)?;
        self.releases = releases;
        self.commit(timeline, widget);
        Ok(())
    }

    /// Replace the active filters
    pub fn set_filters(&mut self, filters: FilterSet) -> Result<(), ViewerError> {
        self.ensure_active()?;
        if self.loaded {
            let (timeline, widget) = self.render(&self.tasks, &self.releases, &filters, &self.config)?;
            self.commit(timeline, widget);
        }
        self.filters = filters;
        Ok(())
    }

    /// Toggle the releases row
    pub fn set_show_releases(&mut self, show: bool) -> Result<(), ViewerError> {
        self.ensure_active()?;
        let config = TimelineConfig {
            show_releases: show,
            ..self.config.clone()
        };
        if self.loaded {
            let (timeline, widget) = self.render(&self.tasks, &self.releases, &self.filters, &config)?;
            self.commit(timeline, widget);
        }
        self.config = config;
        Ok(())
    }

    /// Sorted distinct values of a field over all loaded tasks
    pub fn unique_values(&self, field: TaskField) -> Vec<String> {
        unique_values(&self.tasks, field)
    }

    /// Release the widget; the viewer cannot be used afterwards
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        if let Some(mut widget) = self.widget.take() {
            widget.destroy();
        }
        self.destroyed = true;
        tracing::debug!(container = %self.container, "viewer destroyed");
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The mounted widget, if any data has been shown
    pub fn widget(&self) -> Option<&R::Widget> {
        self.widget.as_ref()
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn releases(&self) -> &[ReleaseRecord] {
        &self.releases
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Whether a task or release workbook has been loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn ensure_active(&self) -> Result<(), ViewerError> {
        if self.destroyed {
            Err(ViewerError::Destroyed)
        } else {
            Ok(())
        }
    }

    async fn read(&self, source: &Source) -> Result<Vec<u8>, ViewerError> {
        match source {
            Source::File(path) => Ok(tokio::fs::read(path).await?),
            Source::Url(url) => {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ViewerError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.bytes().await?.to_vec())
            }
            Source::Bytes(bytes) => Ok(bytes.clone()),
        }
    }

    fn render(
        &self,
        tasks: &[TaskRecord],
        releases: &[ReleaseRecord],
        filters: &FilterSet,
        config: &TimelineConfig,
    ) -> Result<(Timeline, R::Widget), ViewerError> {
        let timeline = build_timeline(tasks, releases, filters, config);
        let widget = self
            .renderer
            .mount(&self.container, &timeline, &self.options, &config.colors)?;
        Ok((timeline, widget))
    }

    /// Swap in a freshly mounted widget, destroying the previous one
    fn commit(&mut self, timeline: Timeline, widget: R::Widget) {
        if let Some(mut old) = self.widget.replace(widget) {
            old.destroy();
        }
        self.timeline = timeline;
        self.loaded = true;
    }
}

impl<R: TimelineRenderer> Drop for GanttViewer<R> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use xlgantt_core::CategoryStyles;
    use xlgantt_render::TemplateWriter;

    /// Renderer that counts mounts and can be told to fail
    #[derive(Default)]
    struct CountingRenderer {
        mounts: Rc<Cell<usize>>,
        fail: Rc<Cell<bool>>,
    }

    struct CountingWidget {
        groups: usize,
        destroyed: bool,
    }

    impl TimelineWidget for CountingWidget {
        fn destroy(&mut self) {
            self.destroyed = true;
        }

        fn is_destroyed(&self) -> bool {
            self.destroyed
        }
    }

    impl TimelineRenderer for CountingRenderer {
        type Widget = CountingWidget;

        fn mount(
            &self,
            _container: &str,
            timeline: &Timeline,
            _options: &DisplayOptions,
            _styles: &CategoryStyles,
        ) -> Result<CountingWidget, RenderError> {
            if self.fail.get() {
                return Err(RenderError::InvalidData("mount refused".into()));
            }
            self.mounts.set(self.mounts.get() + 1);
            Ok(CountingWidget {
                groups: timeline.groups.len(),
                destroyed: false,
            })
        }
    }

    fn viewer() -> (GanttViewer<CountingRenderer>, Rc<Cell<usize>>, Rc<Cell<bool>>) {
        let renderer = CountingRenderer::default();
        let mounts = Rc::clone(&renderer.mounts);
        let fail = Rc::clone(&renderer.fail);
        (GanttViewer::new(renderer, "timeline", Config::default()), mounts, fail)
    }

    fn tasks_xlsx() -> Vec<u8> {
        TemplateWriter::default().tasks_workbook().unwrap()
    }

    fn releases_xlsx() -> Vec<u8> {
        TemplateWriter::default().releases_workbook().unwrap()
    }

    #[test]
    fn starts_empty() {
        let (viewer, mounts, _) = viewer();
        assert!(!viewer.is_loaded());
        assert!(viewer.timeline().is_empty());
        assert!(viewer.widget().is_none());
        assert_eq!(mounts.get(), 0);
    }

    #[test]
    fn filters_before_load_are_stored_without_mounting() {
        let (mut viewer, mounts, _) = viewer();
        viewer.set_filters(FilterSet::new().priorities(["High"])).unwrap();
        assert_eq!(mounts.get(), 0);

        viewer.load_tasks_bytes(&tasks_xlsx()).unwrap();
        assert_eq!(viewer.timeline().groups.len(), 1, "stored filter applies on load");
    }

    #[test]
    fn every_change_remounts() {
        let (mut viewer, mounts, _) = viewer();
        viewer.load_tasks_bytes(&tasks_xlsx()).unwrap();
        assert_eq!(viewer.widget().unwrap().groups, 3);

        viewer.load_releases_bytes(&releases_xlsx()).unwrap();
        assert_eq!(viewer.widget().unwrap().groups, 3, "releases hidden by default");

        viewer.set_show_releases(true).unwrap();
        assert_eq!(viewer.widget().unwrap().groups, 4);
        assert!(viewer.config().show_releases);

        viewer.set_filters(FilterSet::new().task_types(["Bug"])).unwrap();
        assert_eq!(viewer.widget().unwrap().groups, 2);
        assert_eq!(mounts.get(), 4);
    }

    #[test]
    fn failed_parse_keeps_previous_state() {
        let (mut viewer, mounts, _) = viewer();
        viewer.load_tasks_bytes(&tasks_xlsx()).unwrap();
        let before = viewer.timeline().clone();

        let result = viewer.load_tasks_bytes(b"not a workbook");
        assert!(matches!(result, Err(ViewerError::Parse(_))));
        assert_eq!(viewer.tasks().len(), 3);
        assert_eq!(viewer.timeline(), &before);
        assert!(!viewer.widget().unwrap().is_destroyed());
        assert_eq!(mounts.get(), 1);
    }

    #[test]
    fn failed_mount_keeps_previous_state() {
        let (mut viewer, _, fail) = viewer();
        viewer.load_tasks_bytes(&tasks_xlsx()).unwrap();

        fail.set(true);
        let result = viewer.set_filters(FilterSet::new().task_types(["Bug"]));
        assert!(matches!(result, Err(ViewerError::Render(_))));
        assert!(viewer.filters().is_empty());
        assert_eq!(viewer.widget().unwrap().groups, 3);

        let result = viewer.set_show_releases(true);
        assert!(result.is_err());
        assert!(!viewer.config().show_releases);
    }

    #[test]
    fn unique_values_cover_loaded_tasks() {
        let (mut viewer, _, _) = viewer();
        assert!(viewer.unique_values(TaskField::Priority).is_empty());
        viewer.load_tasks_bytes(&tasks_xlsx()).unwrap();
        assert_eq!(viewer.unique_values(TaskField::Priority), ["High", "Low", "Medium"]);
    }

    #[test]
    fn destroy_is_terminal() {
        let (mut viewer, _, _) = viewer();
        viewer.load_tasks_bytes(&tasks_xlsx()).unwrap();

        viewer.destroy();
        assert!(viewer.is_destroyed());
        assert!(viewer.widget().is_none());
        viewer.destroy();

        assert!(matches!(
            viewer.load_tasks_bytes(&tasks_xlsx()),
            Err(ViewerError::Destroyed)
        ));
        assert!(matches!(
            viewer.set_filters(FilterSet::default()),
            Err(ViewerError::Destroyed)
        ));
        assert!(matches!(viewer.set_show_releases(true), Err(ViewerError::Destroyed)));
        assert_eq!(viewer.tasks().len(), 3);
    }
}
