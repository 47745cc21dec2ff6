//! The template project a fresh editor opens with.

use crate::config::EditorConfig;
use crate::element::{AudioContent, ImageContent, QrCodeContent, TextContent, VideoContent};
use crate::{
    EditorState, Element, ElementKind, Fill, Layout, Page, Position, Resource, ResourceKind, Size,
};

const UNSPLASH: &str = "https://images.unsplash.com";
const SAMPLE_NAME: &str = "Book in a jungle s...";
const BACKGROUND: &str = "#FCFAFF";

fn photo(id: &str, width: u32, height: u32) -> String {
    format!("{UNSPLASH}/photo-{id}?w={width}&h={height}&fit=crop")
}

fn image_resource(id: &str, photo_id: &str) -> Resource {
    Resource::new(ResourceKind::Image, SAMPLE_NAME, photo(photo_id, 400, 300))
        .with_id(id)
        .with_thumbnail(photo(photo_id, 200, 150))
}

fn audio_resource(id: &str, src: &str, duration: f64) -> Resource {
    Resource::new(ResourceKind::Audio, SAMPLE_NAME, src)
        .with_id(id)
        .with_duration(duration)
}

fn background_audio(id: &str) -> Element {
    Element::new(
        "Audio.mp3",
        ElementKind::Audio(AudioContent {
            src: "/audio/background.mp3".into(),
            volume: 75,
            fade_in: 1.5,
            fade_out: 1.5,
        }),
    )
    .with_id(id)
    .with_frame(Position::default(), Size::default())
    .with_timing(0.0, 180.0)
}

fn image(id: &str, src: String, frame: (Position, Size)) -> Element {
    Element::new("Image.jpg", ElementKind::Image(ImageContent { src, fill: Fill::Fill }))
        .with_id(id)
        .with_frame(frame.0, frame.1)
}

fn video(id: &str, photo_id: &str, frame: (Position, Size), thumbnail_size: (u32, u32)) -> Element {
    Element::new(
        "Video.mp4",
        ElementKind::Video(VideoContent {
            src: photo(photo_id, thumbnail_size.0 * 2, thumbnail_size.1 * 2),
            volume: 75,
            fill: Fill::Fill,
            thumbnail: Some(photo(photo_id, thumbnail_size.0, thumbnail_size.1)),
        }),
    )
    .with_id(id)
    .with_frame(frame.0, frame.1)
}

fn text_band(id: &str, content: &str, font_size: f64, colors: (&str, &str), height: f64) -> Element {
    Element::new(
        "Text",
        ElementKind::Text(TextContent {
            content: content.into(),
            font_size,
            font_weight: "600".into(),
            color: colors.0.into(),
            background_color: Some(colors.1.into()),
        }),
    )
    .with_id(id)
    .with_frame(Position::new(0.0, 280.0), Size::new(640.0, height))
}

fn half(x: f64) -> (Position, Size) {
    (Position::new(x, 0.0), Size::new(320.0, 240.0))
}

impl EditorState {
    /// The editor's template project: three pages and eight library items.
    #[must_use]
    pub fn sample() -> Self {
        Self::sample_with(&EditorConfig::default())
    }

    /// [`EditorState::sample`] with zoom bounds taken from `config`.
    #[must_use]
    pub fn sample_with(config: &EditorConfig) -> Self {
        let page1 = Page::new("Page 1", 180.0, BACKGROUND)
            .with_id("page-1")
            .with_layout(Layout::TwoHorizontal)
            .with_elements(vec![
                video("el-1-1", "1600596542815-ffad4c1539a9", half(0.0), (400, 300)),
                Element::new(
                    "QR Code",
                    ElementKind::QrCode(QrCodeContent {
                        data: "https://example.com".into(),
                        title: Some("Title Goes There".into()),
                    }),
                )
                .with_id("el-1-2")
                .with_frame(Position::new(350.0, 50.0), Size::new(120.0, 150.0))
                .with_free_position(true),
                text_band("el-1-3", "Title Goes There", 28.0, ("#0891b2", "#fce7f3"), 60.0),
                background_audio("el-1-4"),
            ]);

        let page2 = Page::new("Page 2", 180.0, BACKGROUND)
            .with_id("page-2")
            .with_layout(Layout::Single)
            .with_elements(vec![
                image(
                    "el-2-1",
                    photo("1451187580459-43490279c0fa", 800, 500),
                    (Position::default(), Size::new(640.0, 360.0)),
                ),
                background_audio("el-2-2"),
            ]);

        let page3 = Page::new("Page 3", 180.0, BACKGROUND)
            .with_id("page-3")
            .with_layout(Layout::TwoHorizontal)
            .with_elements(vec![
                image("el-3-1", photo("1441986300917-64674bd600d8", 400, 300), half(0.0)),
                video("el-3-2", "1524661135-423995f22d0b", half(320.0), (200, 150))
                    .with_timing(10.0, 30.0),
                text_band("el-3-3", "50% Sale", 24.0, ("#ffffff", "#0891b2"), 50.0),
                background_audio("el-3-4"),
            ]);

        let resources = vec![
            image_resource("res-1", "1600596542815-ffad4c1539a9"),
            audio_resource("res-2", "/audio/sample.mp3", 180.0),
            image_resource("res-3", "1600585154340-be6161a56a0c"),
            audio_resource("res-4", "/audio/sample2.mp3", 120.0),
            image_resource("res-5", "1600607687939-ce8a6c25118c"),
            image_resource("res-6", "1600566753190-17f0baa2a6c3"),
            image_resource("res-7", "1600573472550-8090b5e0745e"),
            audio_resource("res-8", "/audio/sample3.mp3", 90.0),
        ];

        Self::with_pages(
            "Template 2025-08-29",
            "2025-08-29",
            vec![page1, page2, page3],
            resources,
            config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementId, ElementType, PageId, ResourceTab};

    #[test]
    fn test_sample_is_valid() {
        let state = EditorState::sample();
        state.validate().expect("sample project is consistent");
        assert_eq!(state.project_name(), "Template 2025-08-29");
        assert_eq!(state.current_page_id(), &PageId::from("page-1"));
        assert_eq!(state.pages().len(), 3);
        assert_eq!(state.resources().len(), 8);
        assert_eq!(state.zoom(), 60);
        assert_eq!(state.active_resource_tab(), ResourceTab::All);
    }

    #[test]
    fn test_sample_page_one_contents() {
        let state = EditorState::sample();
        let types: Vec<ElementType> = state.current_elements().iter().map(Element::element_type).collect();
        assert_eq!(
            types,
            vec![ElementType::Video, ElementType::QrCode, ElementType::Text, ElementType::Audio]
        );
        assert_eq!(state.free_elements().count(), 1);
        assert_eq!(state.visual_elements().count(), 3);
        assert_eq!(state.overlay_text_elements().count(), 1);
    }

    #[test]
    fn test_sample_page_three_video_window() {
        let state = EditorState::sample();
        let page = state.page(&PageId::from("page-3")).expect("page-3");
        let video = page.element(&ElementId::from("el-3-2")).expect("el-3-2");
        assert!((video.start_time - 10.0).abs() < f64::EPSILON);
        assert!((video.end_time() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sample_audio_resources_carry_durations() {
        let state = EditorState::sample();
        let durations: Vec<f64> = state
            .resources()
            .iter()
            .filter(|r| r.kind == ResourceKind::Audio)
            .filter_map(|r| r.duration)
            .collect();
        assert_eq!(durations, vec![180.0, 120.0, 90.0]);
    }
}
