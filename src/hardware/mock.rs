//! Mock providers and recording sinks for testing and development
//!
//! Every mock shares its state through `Rc<RefCell<_>>`, so a clone kept by a
//! test observes what the compass controller did with the boxed original.

use crate::api::render::{Element, IconAnchor, RenderSink, Transform};
use crate::api::status::{StatusChannel, StatusSink};
use crate::hardware::error::{SensorError, SensorResult};
use crate::hardware::location::{LocationOptions, LocationProvider, WatchId};
use crate::hardware::orientation::OrientationProvider;
use log::info;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// One call received by a [`RecordingRenderSink`]
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    Transform { element: String, value: String },
    Anchor { landmark_id: String, anchor: IconAnchor },
    Text { element: String, text: String },
}

#[derive(Debug, Default)]
struct RenderRecord {
    compass_diameter: Option<f64>,
    icon_sizes: HashMap<String, (f64, f64)>,
    transforms: BTreeMap<String, String>,
    anchors: BTreeMap<String, IconAnchor>,
    texts: BTreeMap<String, String>,
    history: Vec<RenderOp>,
}

/// Render sink that remembers every call
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderSink {
    record: Rc<RefCell<RenderRecord>>,
}

impl RecordingRenderSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compass_diameter(self, diameter_px: f64) -> Self {
        self.record.borrow_mut().compass_diameter = Some(diameter_px);
        self
    }

    pub fn with_icon_size(self, landmark_id: &str, width_px: f64, height_px: f64) -> Self {
        self.record
            .borrow_mut()
            .icon_sizes
            .insert(landmark_id.to_string(), (width_px, height_px));
        self
    }

    /// Latest transform applied to the element with this name
    pub fn transform(&self, element: &str) -> Option<String> {
        self.record.borrow().transforms.get(element).cloned()
    }

    pub fn text(&self, element: &str) -> Option<String> {
        self.record.borrow().texts.get(element).cloned()
    }

    pub fn anchor(&self, landmark_id: &str) -> Option<IconAnchor> {
        self.record.borrow().anchors.get(landmark_id).copied()
    }

    /// Latest transform per element
    pub fn current_transforms(&self) -> BTreeMap<String, String> {
        self.record.borrow().transforms.clone()
    }

    pub fn history(&self) -> Vec<RenderOp> {
        self.record.borrow().history.clone()
    }

    pub fn op_count(&self) -> usize {
        self.record.borrow().history.len()
    }

    pub fn clear_history(&self) {
        self.record.borrow_mut().history.clear();
    }
}

impl RenderSink for RecordingRenderSink {
    fn compass_diameter_px(&self) -> Option<f64> {
        self.record.borrow().compass_diameter
    }

    fn icon_size_px(&self, landmark_id: &str) -> Option<(f64, f64)> {
        self.record.borrow().icon_sizes.get(landmark_id).copied()
    }

    fn set_transform(&mut self, element: Element<'_>, transform: &Transform) {
        let element = element.to_string();
        let value = transform.to_string();
        let mut record = self.record.borrow_mut();
        record.transforms.insert(element.clone(), value.clone());
        record.history.push(RenderOp::Transform { element, value });
    }

    fn set_icon_anchor(&mut self, landmark_id: &str, anchor: &IconAnchor) {
        let mut record = self.record.borrow_mut();
        record.anchors.insert(landmark_id.to_string(), *anchor);
        record.history.push(RenderOp::Anchor {
            landmark_id: landmark_id.to_string(),
            anchor: *anchor,
        });
    }

    fn set_text(&mut self, element: Element<'_>, text: &str) {
        let element = element.to_string();
        let mut record = self.record.borrow_mut();
        record.texts.insert(element.clone(), text.to_string());
        record.history.push(RenderOp::Text {
            element,
            text: text.to_string(),
        });
    }
}

/// Status sink that remembers every message and logs it
#[derive(Debug, Clone, Default)]
pub struct RecordingStatusSink {
    messages: Rc<RefCell<Vec<(StatusChannel, String)>>>,
}

impl RecordingStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(StatusChannel, String)> {
        self.messages.borrow().clone()
    }

    /// Most recent message on `channel`
    pub fn latest(&self, channel: StatusChannel) -> Option<String> {
        self.messages
            .borrow()
            .iter()
            .rev()
            .find(|(c, _)| *c == channel)
            .map(|(_, message)| message.clone())
    }
}

impl StatusSink for RecordingStatusSink {
    fn update_status(&mut self, channel: StatusChannel, message: &str) {
        info!("[{}] {}", channel, message);
        self.messages.borrow_mut().push((channel, message.to_string()));
    }
}

#[derive(Debug, Default)]
struct LocationRecord {
    supported: bool,
    position_requests: u32,
    last_options: Option<LocationOptions>,
    next_watch_id: u32,
    active_watches: Vec<WatchId>,
    cleared_watches: Vec<WatchId>,
}

/// Location provider that only records requests; fixes are fed by the test
#[derive(Debug, Clone)]
pub struct MockLocationProvider {
    record: Rc<RefCell<LocationRecord>>,
}

impl Default for MockLocationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLocationProvider {
    pub fn new() -> Self {
        Self {
            record: Rc::new(RefCell::new(LocationRecord {
                supported: true,
                ..LocationRecord::default()
            })),
        }
    }

    pub fn unsupported() -> Self {
        let provider = Self::new();
        provider.record.borrow_mut().supported = false;
        provider
    }

    pub fn position_requests(&self) -> u32 {
        self.record.borrow().position_requests
    }

    pub fn last_options(&self) -> Option<LocationOptions> {
        self.record.borrow().last_options
    }

    pub fn active_watches(&self) -> Vec<WatchId> {
        self.record.borrow().active_watches.clone()
    }

    pub fn cleared_watches(&self) -> Vec<WatchId> {
        self.record.borrow().cleared_watches.clone()
    }
}

impl LocationProvider for MockLocationProvider {
    fn is_supported(&self) -> bool {
        self.record.borrow().supported
    }

    fn request_current_position(&mut self, options: &LocationOptions) {
        let mut record = self.record.borrow_mut();
        record.position_requests += 1;
        record.last_options = Some(*options);
    }

    fn watch_position(&mut self, options: &LocationOptions) -> WatchId {
        let mut record = self.record.borrow_mut();
        record.next_watch_id += 1;
        let id = WatchId(record.next_watch_id);
        record.active_watches.push(id);
        record.last_options = Some(*options);
        id
    }

    fn clear_watch(&mut self, watch_id: WatchId) {
        let mut record = self.record.borrow_mut();
        record.active_watches.retain(|id| *id != watch_id);
        record.cleared_watches.push(watch_id);
    }
}

#[derive(Debug)]
struct OrientationRecord {
    supported: bool,
    requires_permission: bool,
    permission: SensorResult<()>,
    absolute: bool,
    permission_requests: u32,
    subscription: Option<bool>,
}

/// Orientation provider with scripted capabilities
#[derive(Debug, Clone)]
pub struct MockOrientationProvider {
    record: Rc<RefCell<OrientationRecord>>,
}

impl Default for MockOrientationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOrientationProvider {
    /// Supported, absolute events, no permission gate
    pub fn new() -> Self {
        Self {
            record: Rc::new(RefCell::new(OrientationRecord {
                supported: true,
                requires_permission: false,
                permission: Ok(()),
                absolute: true,
                permission_requests: 0,
                subscription: None,
            })),
        }
    }

    pub fn unsupported() -> Self {
        let provider = Self::new();
        provider.record.borrow_mut().supported = false;
        provider
    }

    /// Gate events behind a permission request answering `outcome`
    pub fn with_permission(self, outcome: SensorResult<()>) -> Self {
        {
            let mut record = self.record.borrow_mut();
            record.requires_permission = true;
            record.permission = outcome;
        }
        self
    }

    pub fn relative_only(self) -> Self {
        self.record.borrow_mut().absolute = false;
        self
    }

    pub fn permission_requests(&self) -> u32 {
        self.record.borrow().permission_requests
    }

    /// `Some(absolute)` while subscribed
    pub fn subscription(&self) -> Option<bool> {
        self.record.borrow().subscription
    }
}

impl OrientationProvider for MockOrientationProvider {
    fn is_supported(&self) -> bool {
        self.record.borrow().supported
    }

    fn requires_permission(&self) -> bool {
        self.record.borrow().requires_permission
    }

    fn request_permission(&mut self) -> SensorResult<()> {
        let mut record = self.record.borrow_mut();
        record.permission_requests += 1;
        if !record.supported {
            return Err(SensorError::UnsupportedCapability);
        }
        record.permission
    }

    fn supports_absolute(&self) -> bool {
        self.record.borrow().absolute
    }

    fn subscribe(&mut self, absolute: bool) {
        self.record.borrow_mut().subscription = Some(absolute);
    }

    fn unsubscribe(&mut self) {
        self.record.borrow_mut().subscription = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_watch_bookkeeping() {
        let mut provider = MockLocationProvider::new();
        let observer = provider.clone();

        let first = provider.watch_position(&LocationOptions::default());
        let second = provider.watch_position(&LocationOptions::default());
        assert_ne!(first, second);
        assert_eq!(observer.active_watches().len(), 2);

        provider.clear_watch(first);
        assert_eq!(observer.active_watches(), vec![second]);
        assert_eq!(observer.cleared_watches(), vec![first]);
    }

    #[test]
    fn test_orientation_permission_outcome() {
        let mut provider = MockOrientationProvider::new().with_permission(Err(SensorError::PermissionDenied));
        assert!(provider.requires_permission());
        assert_eq!(provider.request_permission(), Err(SensorError::PermissionDenied));
        assert_eq!(provider.permission_requests(), 1);
    }

    #[test]
    fn test_status_sink_latest_per_channel() {
        let mut sink = RecordingStatusSink::new();
        sink.update_status(StatusChannel::Location, "a");
        sink.update_status(StatusChannel::Compass, "b");
        sink.update_status(StatusChannel::Location, "c");

        assert_eq!(sink.latest(StatusChannel::Location).as_deref(), Some("c"));
        assert_eq!(sink.latest(StatusChannel::Compass).as_deref(), Some("b"));
        assert_eq!(sink.messages().len(), 3);
    }
}
