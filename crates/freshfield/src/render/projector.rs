use chrono::{DateTime, Datelike, Local, Utc};
use freshfield_api::{Feature, Update};

use crate::dom::Node;

pub const FALLBACK_GLYPH: &str = "•";
pub const EMPTY_LIST_TEXT: &str = "No updates available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `M/D/YYYY`
    #[default]
    Numeric,
    /// `D. M. YYYY`
    Dotted,
}

/// Local calendar date of `created`.
#[must_use]
pub fn format_date(created: DateTime<Utc>, style: DateStyle) -> String {
    let local = created.with_timezone(&Local);
    match style {
        DateStyle::Numeric => format!("{}/{}/{}", local.month(), local.day(), local.year()),
        DateStyle::Dotted => format!("{}. {}. {}", local.day(), local.month(), local.year()),
    }
}

#[must_use]
pub fn project_update_list(updates: &[Update]) -> Node {
    if updates.is_empty() {
        return Node::new("p").with_class("_ffEmpty").with_text(EMPTY_LIST_TEXT);
    }
    Node::new("div")
        .with_class("_ffUpdatesList")
        .with_children(updates.iter().map(project_update))
}

#[must_use]
pub fn project_update(update: &Update) -> Node {
    let mut header = Node::new("div").with_class("_ffUpdateHeader");
    if let Some(version) = update.version_label() {
        header.children.push(
            Node::new("span")
                .with_class("_ffUpdateVersion")
                .with_text(version),
        );
    }
    header.children.push(title_node(update, "h3"));
    header
        .children
        .push(date_node(update, "time", DateStyle::Numeric));

    Node::new("div").with_class("_ffUpdate").with_children([
        header,
        description_node(update),
        Node::new("div")
            .with_class("_ffFeaturesList")
            .with_children(update.features.iter().map(project_feature)),
    ])
}

#[must_use]
pub fn project_feature(feature: &Feature) -> Node {
    let kind = feature.kind.as_str();
    Node::new("div")
        .with_class(&format!("_ffFeature _ffFeature-{kind}"))
        .with_child(feature_icon(feature))
        .with_child(
            Node::new("div").with_class("_ffFeatureContent").with_children([
                Node::new("h4")
                    .with_class("_ffFeatureName")
                    .with_text(&feature.name),
                Node::new("p")
                    .with_class("_ffFeatureDescription")
                    .with_text(&feature.description),
                feature_label(feature),
            ]),
        )
}

/// Resolved SVG markup, the raw reference as text when icons were fetched in
/// text mode, or the fallback glyph.
#[must_use]
pub fn feature_icon(feature: &Feature) -> Node {
    match feature.icon_content() {
        Some(icon) if icon.trim_start().starts_with('<') => Node::new("span")
            .with_class("_ffFeatureIcon")
            .with_markup(icon),
        Some(icon) => Node::new("span")
            .with_class("_ffFeatureIcon _ffFeatureIconText")
            .with_text(icon),
        None => Node::new("span")
            .with_class("_ffFeatureIcon _ffFeatureIconFallback")
            .with_text(FALLBACK_GLYPH),
    }
}

#[must_use]
pub fn feature_label(feature: &Feature) -> Node {
    let kind = feature.kind.as_str();
    Node::new("span")
        .with_class(&format!("_ffFeatureLabel _ffFeatureLabel-{kind}"))
        .with_text(kind)
}

pub(crate) fn title_node(update: &Update, tag: &'static str) -> Node {
    Node::new(tag)
        .with_class("_ffUpdateTitle")
        .with_text(&update.title)
}

pub(crate) fn date_node(update: &Update, tag: &'static str, style: DateStyle) -> Node {
    let node = Node::new(tag)
        .with_class("_ffUpdateDate")
        .with_text(format_date(update.created, style));
    if tag == "time" {
        node.with_attr("datetime", update.created.to_rfc3339())
    } else {
        node
    }
}

pub(crate) fn description_node(update: &Update) -> Node {
    Node::new("div")
        .with_class("_ffUpdateDescription")
        .with_markup(&update.description)
}
