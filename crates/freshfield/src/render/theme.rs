use freshfield_api::Update;

use super::projector::{
    DateStyle, date_node, description_node, feature_icon, feature_label, project_feature,
    title_node,
};
use crate::dom::Node;

pub const CLOSE_BUTTON_CLASS: &str = "_ffModalClose";

/// Layout of the latest-update modal. Each variant is a complete layout;
/// the variant is chosen once per presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalTheme {
    #[default]
    Default,
    Modern,
}

impl ModalTheme {
    /// Build the modal content (everything inside the overlay).
    #[must_use]
    pub fn render(self, update: &Update, submit_button_text: &str) -> Node {
        match self {
            Self::Default => default_layout(update, submit_button_text),
            Self::Modern => modern_layout(update, submit_button_text),
        }
    }
}

fn default_layout(update: &Update, submit_button_text: &str) -> Node {
    Node::new("div").with_class("_ffModalContent").with_children([
        title_node(update, "h3"),
        date_node(update, "time", DateStyle::Numeric),
        description_node(update),
        Node::new("div")
            .with_class("_ffFeaturesList")
            .with_children(update.features.iter().map(project_feature)),
        close_button(submit_button_text),
    ])
}

fn modern_layout(update: &Update, submit_button_text: &str) -> Node {
    let header = Node::new("div").with_class("_ffUpdateHeader").with_children([
        Node::new("p")
            .with_class("_ffUpdateVersion")
            .with_text(update.version_label().unwrap_or_default()),
        date_node(update, "p", DateStyle::Dotted),
    ]);

    let features = update.features.iter().map(|feature| {
        Node::new("div").with_class("_ffFeature").with_children([
            Node::new("div").with_class("_ffFeatureHeader").with_children([
                feature_icon(feature),
                Node::new("h3")
                    .with_class("_ffFeatureTitle")
                    .with_text(&feature.name),
                feature_label(feature),
            ]),
            Node::new("p")
                .with_class("_ffFeatureText")
                .with_text(&feature.description),
        ])
    });

    Node::new("div")
        .with_class("_ffModalContent modern")
        .with_children([
            header,
            title_node(update, "h3"),
            Node::new("div")
                .with_class("_ffFeaturesList")
                .with_children(features),
            close_button(submit_button_text),
        ])
}

fn close_button(text: &str) -> Node {
    Node::new("button")
        .with_class(CLOSE_BUTTON_CLASS)
        .with_attr("type", "button")
        .with_text(text)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use freshfield_api::{Feature, FeatureKind};

    use super::*;

    fn update() -> Update {
        Update {
            id: "u9".to_string(),
            created: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            title: "June".to_string(),
            description: "<p>notes</p>".to_string(),
            version: Some("4.0.0".to_string()),
            features: vec![Feature {
                kind: FeatureKind::New,
                name: "Widgets".to_string(),
                description: "More widgets".to_string(),
                icon: None,
            }],
        }
    }

    #[test]
    fn default_layout_has_description_and_close_button() {
        let node = ModalTheme::Default.render(&update(), "Got it!");

        assert!(node.has_class("_ffModalContent"));
        assert!(!node.has_class("modern"));
        assert_eq!(
            node.find_by_class("_ffUpdateDescription")
                .and_then(Node::markup),
            Some("<p>notes</p>")
        );
        assert_eq!(
            node.find_by_class(CLOSE_BUTTON_CLASS).and_then(Node::text),
            Some("Got it!")
        );
        assert_eq!(node.count_by_class("_ffFeature"), 1);
    }

    #[test]
    fn modern_layout_has_version_header_and_feature_cards() {
        let node = ModalTheme::Modern.render(&update(), "Close");

        assert!(node.has_class("modern"));
        assert_eq!(
            node.find_by_class("_ffUpdateVersion").and_then(Node::text),
            Some("4.0.0")
        );
        assert!(node.find_by_class("_ffUpdateDescription").is_none());
        let card = node.find_by_class("_ffFeatureHeader").expect("card header");
        assert_eq!(
            card.find_by_class("_ffFeatureTitle").and_then(Node::text),
            Some("Widgets")
        );
        assert_eq!(
            card.find_by_class("_ffFeatureLabel").and_then(Node::text),
            Some("new")
        );
        assert_eq!(
            node.find_by_class(CLOSE_BUTTON_CLASS).and_then(Node::text),
            Some("Close")
        );
    }
}
