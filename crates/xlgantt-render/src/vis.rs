//! vis-timeline HTML renderer
//!
//! Generates a standalone HTML page that loads vis-timeline and mounts the
//! timeline into a container element. Features:
//! - Group labels with the full task name as hover text
//! - Per-category colors as CSS scoped to the page
//! - Tooltips from the item titles
//! - Optional legend and dark theme

use serde::Serialize;
use xlgantt_core::{
    is_css_value, CategoryStyles, DisplayGroup, DisplayItem, DisplayOptions, GroupKind,
    ItemCategory, ItemKind, RenderError, Timeline, TimelineRenderer, TimelineWidget,
};

pub const DEFAULT_SCRIPT_URL: &str =
    "https://unpkg.com/vis-timeline@7.7.3/standalone/umd/vis-timeline-graph2d.min.js";
pub const DEFAULT_STYLESHEET_URL: &str =
    "https://unpkg.com/vis-timeline@7.7.3/styles/vis-timeline-graph2d.min.css";

/// Page colors around the widget
#[derive(Clone, Debug)]
pub struct PageTheme {
    pub background_color: String,
    pub text_color: String,
    pub panel_color: String,
    pub border_color: String,
}

impl Default for PageTheme {
    fn default() -> Self {
        Self::light()
    }
}

impl PageTheme {
    pub fn light() -> Self {
        Self {
            background_color: "#ffffff".into(),
            text_color: "#1f2937".into(),
            panel_color: "#f9fafb".into(),
            border_color: "#e5e7eb".into(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background_color: "#1a1a2e".into(),
            text_color: "#eaeaea".into(),
            panel_color: "#16213e".into(),
            border_color: "#2d2d44".into(),
        }
    }
}

/// HTML timeline renderer configuration
#[derive(Clone, Debug)]
pub struct VisTimelineRenderer {
    /// Page title and heading
    pub title: String,
    pub script_url: String,
    pub stylesheet_url: String,
    /// CSS width of the group label column
    pub label_width: String,
    pub show_legend: bool,
    pub theme: PageTheme,
}

impl Default for VisTimelineRenderer {
    fn default() -> Self {
        Self {
            title: "Project Timeline".into(),
            script_url: DEFAULT_SCRIPT_URL.into(),
            stylesheet_url: DEFAULT_STYLESHEET_URL.into(),
            label_width: "25%".into(),
            show_legend: true,
            theme: PageTheme::default(),
        }
    }
}

impl VisTimelineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn label_width(mut self, width: impl Into<String>) -> Self {
        self.label_width = width.into();
        self
    }

    /// Load vis-timeline from somewhere other than the public CDN
    pub fn assets(mut self, script_url: impl Into<String>, stylesheet_url: impl Into<String>) -> Self {
        self.script_url = script_url.into();
        self.stylesheet_url = stylesheet_url.into();
        self
    }

    pub fn hide_legend(mut self) -> Self {
        self.show_legend = false;
        self
    }

    pub fn dark_theme(mut self) -> Self {
        self.theme = PageTheme::dark();
        self
    }

    /// Full HTML document for the timeline
    pub fn render_document(
        &self,
        container: &str,
        timeline: &Timeline,
        options: &DisplayOptions,
        styles: &CategoryStyles,
    ) -> Result<String, RenderError> {
        self.check_css_values(styles)?;

        let groups: Vec<VisGroup> = timeline.groups.iter().map(VisGroup::from_group).collect();
        let items: Vec<VisItem> = timeline.items.iter().map(VisItem::from_item).collect();

        let groups_json = script_json(&groups)?;
        let items_json = script_json(&items)?;
        let options_json = script_json(options)?;

        let legend = if self.show_legend {
            self.generate_legend(styles)
        } else {
            String::new()
        };

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{stylesheet}">
    <style>
{css}
    </style>
</head>
<body>
    <div class="timeline-page">
        <h1>{title}</h1>
        <div id="{container}"></div>
{legend}
    </div>
    <script src="{script}"></script>
    <script>
        const groups = new vis.DataSet({groups_json});
        const items = new vis.DataSet({items_json});
        const options = {options_json};
        const timeline = new vis.Timeline(document.getElementById("{container}"), items, groups, options);
    </script>
</body>
</html>"#,
            title = html_escape(&self.title),
            stylesheet = html_escape(&self.stylesheet_url),
            script = html_escape(&self.script_url),
            css = self.generate_css(styles),
            container = html_escape(container),
            legend = legend,
            groups_json = groups_json,
            items_json = items_json,
            options_json = options_json,
        ))
    }

    /// Values interpolated into the `<style>` element
    fn check_css_values(&self, styles: &CategoryStyles) -> Result<(), RenderError> {
        let theme = [
            ("label width", self.label_width.as_str()),
            ("background color", self.theme.background_color.as_str()),
            ("text color", self.theme.text_color.as_str()),
            ("panel color", self.theme.panel_color.as_str()),
            ("border color", self.theme.border_color.as_str()),
        ];
        let categories = ItemCategory::ALL.map(|category| (category.css_class(), styles.color(category)));

        match theme.into_iter().chain(categories).find(|(_, value)| !is_css_value(value)) {
            Some((name, value)) => Err(RenderError::InvalidData(format!(
                "{} '{}' is not a plain CSS value",
                name, value
            ))),
            None => Ok(()),
        }
    }

    fn generate_css(&self, styles: &CategoryStyles) -> String {
        let mut css = format!(
            r#"        :root {{
            --bg-color: {bg};
            --text-color: {text};
            --panel-color: {panel};
            --border-color: {border};
            --label-width: {label_width};
        }}
        body {{
            font-family: system-ui, -apple-system, sans-serif;
            background: var(--bg-color);
            color: var(--text-color);
            margin: 0;
            padding: 20px;
        }}
        .timeline-page h1 {{
            font-size: 1.5rem;
            font-weight: 600;
            margin-bottom: 16px;
        }}
        .vis-timeline {{
            border-color: var(--border-color);
        }}
        .vis-labelset .vis-label .vis-inner {{
            width: var(--label-width);
        }}
        .task-label small {{
            opacity: 0.7;
        }}
        .timeline-legend {{
            display: flex;
            flex-wrap: wrap;
            gap: 16px;
            padding: 16px;
            margin-top: 16px;
            background: var(--panel-color);
            border-radius: 8px;
        }}
        .legend-item {{
            display: flex;
            align-items: center;
            gap: 8px;
            font-size: 14px;
        }}
        .legend-box {{
            width: 24px;
            height: 24px;
            border-radius: 4px;
        }}
        .legend-dot {{
            font-size: 18px;
        }}
"#,
            bg = self.theme.background_color,
            text = self.theme.text_color,
            panel = self.theme.panel_color,
            border = self.theme.border_color,
            label_width = self.label_width,
        );

        for category in ItemCategory::ALL {
            let color = styles.color(category);
            let class = category.css_class();
            match category {
                ItemCategory::Deadline => css.push_str(&format!(
                    "        .vis-item.{class} {{ color: {color} !important; background: transparent !important; border-color: {color} !important; }}\n        .vis-item.{class} .vis-dot {{ border-color: {color} !important; }}\n",
                    class = class,
                    color = color,
                )),
                _ => {
                    let weight = if category == ItemCategory::Release {
                        " font-weight: 600 !important;"
                    } else {
                        ""
                    };
                    css.push_str(&format!(
                        "        .vis-item.{class} {{ background-color: {color} !important; border-color: {color} !important; color: white !important;{weight} }}\n",
                        class = class,
                        color = color,
                        weight = weight,
                    ));
                }
            }
        }

        css
    }

    fn generate_legend(&self, styles: &CategoryStyles) -> String {
        let mut legend = String::from("        <div class=\"timeline-legend\">\n");
        for category in ItemCategory::ALL {
            let swatch = match category {
                ItemCategory::Deadline => format!(
                    "<span class=\"legend-dot\" style=\"color: {}\">●</span>",
                    html_escape(styles.color(category))
                ),
                _ => format!(
                    "<span class=\"legend-box\" style=\"background: {}\"></span>",
                    html_escape(styles.color(category))
                ),
            };
            legend.push_str(&format!(
                "            <span class=\"legend-item\">{}{}</span>\n",
                swatch,
                category.label()
            ));
        }
        legend.push_str("        </div>");
        legend
    }
}

impl TimelineRenderer for VisTimelineRenderer {
    type Widget = HtmlTimeline;

    fn mount(
        &self,
        container: &str,
        timeline: &Timeline,
        options: &DisplayOptions,
        styles: &CategoryStyles,
    ) -> Result<HtmlTimeline, RenderError> {
        if container.trim().is_empty() {
            return Err(RenderError::InvalidData(
                "container id must not be empty".into(),
            ));
        }

        let html = self.render_document(container, timeline, options, styles)?;
        tracing::debug!(
            container,
            groups = timeline.groups.len(),
            items = timeline.items.len(),
            "mounted timeline"
        );
        Ok(HtmlTimeline {
            container: container.to_string(),
            html: Some(html),
        })
    }
}

/// A rendered HTML page; destroying it drops the document
#[derive(Clone, Debug)]
pub struct HtmlTimeline {
    container: String,
    html: Option<String>,
}

impl HtmlTimeline {
    pub fn container(&self) -> &str {
        &self.container
    }

    /// The document, `None` once destroyed
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn write_to(&self, path: &std::path::Path) -> Result<(), RenderError> {
        let html = self
            .html()
            .ok_or_else(|| RenderError::InvalidData("timeline was destroyed".into()))?;
        std::fs::write(path, html)?;
        Ok(())
    }
}

impl TimelineWidget for HtmlTimeline {
    fn destroy(&mut self) {
        self.html = None;
    }

    fn is_destroyed(&self) -> bool {
        self.html.is_none()
    }
}

/// Group in vis-timeline's shape
#[derive(Serialize)]
struct VisGroup {
    id: usize,
    content: String,
}

impl VisGroup {
    fn from_group(group: &DisplayGroup) -> Self {
        let content = match group.kind {
            GroupKind::Releases => format!(
                "<div class=\"task-label\"><strong>{}</strong></div>",
                html_escape(&group.label)
            ),
            GroupKind::Task => format!(
                "<div class=\"task-label\"><strong title=\"{}\">{}</strong><br/><small>{}</small></div>",
                html_escape(&group.title),
                html_escape(&group.label),
                html_escape(group.subtitle.as_deref().unwrap_or_default())
            ),
        };
        Self {
            id: group.id,
            content,
        }
    }
}

/// Item in vis-timeline's shape
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VisItem {
    id: String,
    group: usize,
    content: String,
    start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<String>,
    class_name: &'static str,
    title: String,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl VisItem {
    fn from_item(item: &DisplayItem) -> Self {
        Self {
            id: item.id.clone(),
            group: item.group,
            content: html_escape(&item.content),
            start: item.start.format("%Y-%m-%d").to_string(),
            end: item.end.map(|d| d.format("%Y-%m-%d").to_string()),
            class_name: item.category.css_class(),
            title: tooltip_html(&item.title),
            kind: match item.kind {
                ItemKind::Range => "range",
                ItemKind::Point => "point",
            },
        }
    }
}

/// First line bold, one `<br/>` per line break
fn tooltip_html(title: &str) -> String {
    let mut lines = title.lines();
    let Some(first) = lines.next() else {
        return String::new();
    };
    let mut html = format!("<strong>{}</strong>", html_escape(first));
    for line in lines {
        html.push_str("<br/>");
        html.push_str(&html_escape(line));
    }
    html
}

/// JSON safe to embed inside a `<script>` element
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    serde_json::to_string(value)
        .map(|json| json.replace("</", "<\\/"))
        .map_err(|e| RenderError::Format(e.to_string()))
}

/// HTML-escape a string
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn sample_timeline() -> Timeline {
        Timeline {
            groups: vec![
                DisplayGroup {
                    id: 0,
                    kind: GroupKind::Releases,
                    label: "Releases".into(),
                    title: "Releases".into(),
                    subtitle: None,
                },
                DisplayGroup {
                    id: 1,
                    kind: GroupKind::Task,
                    label: "Search <v2>...".into(),
                    title: "Search <v2> with a long name".into(),
                    subtitle: Some("Discovery".into()),
                },
            ],
            items: vec![
                DisplayItem {
                    id: "release-0".into(),
                    group: 0,
                    content: "Release 1.0".into(),
                    start: date(2025, 1, 10),
                    end: Some(date(2025, 1, 10)),
                    kind: ItemKind::Range,
                    category: ItemCategory::Release,
                    title: "Release 1.0\nDevCutDate: 10.01.2025".into(),
                },
                DisplayItem {
                    id: "0-production-deadline".into(),
                    group: 1,
                    content: "●".into(),
                    start: date(2025, 2, 1),
                    end: None,
                    kind: ItemKind::Point,
                    category: ItemCategory::Deadline,
                    title: "Production Deadline\n01.02.2025".into(),
                },
            ],
        }
    }

    fn render(renderer: &VisTimelineRenderer) -> String {
        renderer
            .render_document(
                "timeline",
                &sample_timeline(),
                &DisplayOptions::default(),
                &CategoryStyles::default(),
            )
            .unwrap()
    }

    #[test]
    fn renderer_defaults() {
        let renderer = VisTimelineRenderer::new();
        assert_eq!(renderer.label_width, "25%");
        assert!(renderer.show_legend);
        assert_eq!(renderer.theme.background_color, "#ffffff");
        assert_eq!(VisTimelineRenderer::new().dark_theme().theme.background_color, "#1a1a2e");
    }

    #[test]
    fn produces_standalone_document() {
        let html = render(&VisTimelineRenderer::new().title("Q1 Plan"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<title>Q1 Plan</title>"));
        assert!(html.contains(DEFAULT_SCRIPT_URL));
        assert!(html.contains("new vis.Timeline(document.getElementById(\"timeline\")"));
        assert!(html.contains("<div id=\"timeline\"></div>"));
    }

    #[test]
    fn category_colors_become_scoped_css() {
        let styles = CategoryStyles::default().with_color(ItemCategory::Testing, "#123456");
        let html = VisTimelineRenderer::new()
            .render_document("t", &Timeline::default(), &DisplayOptions::default(), &styles)
            .unwrap();
        assert!(html.contains(".vis-item.phase-testing { background-color: #123456 !important;"));
        assert!(html.contains(".vis-item.phase-analytics { background-color: #6366f1 !important;"));
        assert!(html.contains(".vis-item.production-deadline .vis-dot { border-color: #ef4444"));
    }

    #[test]
    fn group_labels_are_escaped_and_keep_full_name() {
        let html = render(&VisTimelineRenderer::new());
        assert!(html.contains("title=\\\"Search &lt;v2&gt; with a long name\\\""));
        assert!(html.contains("Search &lt;v2&gt;..."));
        assert!(html.contains("<small>Discovery<\\/small>"));
        assert!(!html.contains("<v2>"));
    }

    #[test]
    fn items_use_widget_field_names() {
        let items: Vec<VisItem> = sample_timeline().items.iter().map(VisItem::from_item).collect();
        let json = serde_json::to_value(&items).unwrap();

        assert_eq!(json[0]["className"], "phase-release");
        assert_eq!(json[0]["type"], "range");
        assert_eq!(json[0]["start"], "2025-01-10");
        assert_eq!(json[0]["end"], "2025-01-10");
        assert_eq!(json[0]["title"], "<strong>Release 1.0</strong><br/>DevCutDate: 10.01.2025");

        assert_eq!(json[1]["type"], "point");
        assert_eq!(json[1]["className"], "production-deadline");
        assert!(json[1].get("end").is_none());
    }

    #[test]
    fn legend_is_optional() {
        assert!(render(&VisTimelineRenderer::new()).contains("timeline-legend\">"));
        assert!(!render(&VisTimelineRenderer::new().hide_legend()).contains("timeline-legend\">"));
    }

    #[test]
    fn script_json_cannot_close_the_script_tag() {
        let json = script_json(&["</script><script>alert(1)</script>"]).unwrap();
        assert!(!json.contains("</script>"));
    }

    #[test]
    fn mount_and_destroy() {
        let renderer = VisTimelineRenderer::new();
        let mut widget = renderer
            .mount(
                "gantt",
                &sample_timeline(),
                &DisplayOptions::default(),
                &CategoryStyles::default(),
            )
            .unwrap();
        assert_eq!(widget.container(), "gantt");
        assert!(widget.html().is_some());
        assert!(!widget.is_destroyed());

        widget.destroy();
        assert!(widget.is_destroyed());
        assert!(widget.html().is_none());
        assert!(widget.write_to(std::path::Path::new("unused.html")).is_err());
    }

    #[test]
    fn css_breaking_values_are_refused() {
        let styles = CategoryStyles::default()
            .with_color(ItemCategory::Analytics, "red}</style><script>alert(1)</script>");
        let result = VisTimelineRenderer::new().render_document(
            "t",
            &Timeline::default(),
            &DisplayOptions::default(),
            &styles,
        );
        assert!(matches!(result, Err(RenderError::InvalidData(_))));

        let result = VisTimelineRenderer::new().label_width("25%; } body {").mount(
            "t",
            &Timeline::default(),
            &DisplayOptions::default(),
            &CategoryStyles::default(),
        );
        assert!(matches!(result, Err(RenderError::InvalidData(_))));
    }

    #[test]
    fn mount_requires_container() {
        let result = VisTimelineRenderer::new().mount(
            "  ",
            &Timeline::default(),
            &DisplayOptions::default(),
            &CategoryStyles::default(),
        );
        assert!(matches!(result, Err(RenderError::InvalidData(_))));
    }

    #[test]
    fn html_escape_works() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & \"b\""), "a &amp; &quot;b&quot;");
    }
}
