//! End-to-end panel flows against a mock submission client.

use std::cell::RefCell;

use async_trait::async_trait;
use capture::controller::{CaptureController, HeadlessSurface};
use capture::geometry::{Point, ScrollOffset};
use capture::input::Button;
use capture::raster::{BitmapRasterizer, CroppingRasterizer};
use image::{Rgba, RgbaImage};
use widget::config::PanelConfig;
use widget::net::api::{SubmissionClient, SubmitError};
use widget::net::types::{FeedbackRequest, SubmitResponse};
use widget::state::panel::{FeedbackError, FeedbackPanel, SubmitPhase};

const ISSUE_URL: &str = "https://github.com/example/viewer/issues/1";

#[derive(Default)]
struct RecordingClient {
    requests: RefCell<Vec<FeedbackRequest>>,
}

#[async_trait(?Send)]
impl SubmissionClient for RecordingClient {
    async fn submit(&self, request: &FeedbackRequest) -> Result<SubmitResponse, SubmitError> {
        self.requests.borrow_mut().push(request.clone());
        Ok(SubmitResponse { issue_url: ISSUE_URL.to_owned() })
    }
}

fn page() -> RgbaImage {
    RgbaImage::from_fn(400, 1200, |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255]))
}

#[tokio::test]
async fn typed_description_is_submitted() {
    let mut panel = FeedbackPanel::for_location("/papers/1234.5678/", PanelConfig::default()).unwrap();
    panel.open();
    panel.set_description("button is broken");

    let client = RecordingClient::default();
    let url = panel.submit(&client).await.unwrap();

    assert_eq!(url, ISSUE_URL);
    let requests = client.requests.borrow();
    assert_eq!(
        requests.as_slice(),
        &[FeedbackRequest {
            document_id: "1234.5678".into(),
            text: Some("button is broken".into()),
            image_data: None,
        }]
    );
    let view = panel.view();
    assert!(!view.submit.present);
    assert_eq!(view.issue.unwrap().url, ISSUE_URL);
}

#[tokio::test]
async fn screenshot_of_scrolled_page_is_attached_and_sent() {
    let mut panel = FeedbackPanel::new("1234.5678", PanelConfig::default());
    panel.open();
    let mut controller = CaptureController::new(HeadlessSurface::new());
    let rasterizer = CroppingRasterizer::new(BitmapRasterizer::new(page()));

    let handle = panel.request_screenshot(&mut controller).unwrap();
    assert!(!panel.is_visible());
    controller.pointer_down(Point::new(120.0, 80.0), Button::Primary);
    controller.pointer_move(Point::new(20.0, 30.0));
    let job = controller
        .pointer_up(Point::new(20.0, 30.0), Button::Primary, ScrollOffset::new(0.0, 600.0))
        .unwrap();
    assert!(controller.run_capture(job, &rasterizer).await);
    panel.attach_screenshot(handle.await);

    assert!(panel.is_visible());
    assert_eq!(panel.view().screenshot, Some((100, 50)));
    assert!(controller.surface().overlay().is_none());

    let client = RecordingClient::default();
    panel.submit(&client).await.unwrap();
    let requests = client.requests.borrow();
    assert!(requests[0].text.is_none());
    assert!(requests[0].image_data.as_deref().is_some_and(|d| d.starts_with("/9j/")));
}

#[tokio::test]
async fn empty_report_never_reaches_the_client() {
    let mut panel = FeedbackPanel::new("1234.5678", PanelConfig::default());
    panel.open();
    let client = RecordingClient::default();
    assert_eq!(panel.submit(&client).await.unwrap_err(), FeedbackError::EmptySubmission);
    assert!(client.requests.borrow().is_empty());
    assert_eq!(*panel.phase(), SubmitPhase::Editing);
}

#[tokio::test]
async fn cancelled_capture_leaves_form_usable() {
    let mut panel = FeedbackPanel::new("1234.5678", PanelConfig::default());
    panel.open();
    panel.set_description("math renders twice");
    let mut controller = CaptureController::new(HeadlessSurface::new());

    let handle = panel.request_screenshot(&mut controller).unwrap();
    controller.pointer_down(Point::new(5.0, 5.0), Button::Primary);
    controller.cancel();
    panel.attach_screenshot(handle.await);

    assert!(panel.is_visible());
    assert!(panel.screenshot().is_none());
    assert!(panel.notice().is_none());
    let client = RecordingClient::default();
    panel.submit(&client).await.unwrap();
    assert_eq!(client.requests.borrow()[0].text.as_deref(), Some("math renders twice"));
}
