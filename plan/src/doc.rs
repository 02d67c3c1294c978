//! Document model: floor-plan elements, their properties, and the in-memory store.
//!
//! This module defines what is on the floor plan (`Element`, `ElementDetail`),
//! a creation type without an id (`ElementDraft`), a sparse-update type for
//! incremental edits (`ElementPatch`), the serializable document shape
//! (`FloorPlan`), and the runtime store that owns all live elements together
//! with the selection and the undo history (`DocStore`).
//!
//! Every public mutation is fail-soft: malformed input and unknown ids are
//! logged and ignored, never surfaced as errors. Each mutation that actually
//! changes the element list records one history snapshot; selection changes
//! are not undoable.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::consts::{DEFAULT_FLOORING_OPACITY, DEFAULT_GRID_SIZE, DUPLICATE_OFFSET};
use crate::error::PlanError;
use crate::geom::{Point, Rect, Size};
use crate::history::History;

/// Unique identifier for an element. Opaque; freshly generated ids are UUID v4 strings.
pub type ElementId = String;

/// The kind of an element, without its variant-specific data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Booth,
    Text,
    Shape,
    Image,
    Door,
    Furniture,
    Plant,
}

/// Occupancy status of a booth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoothStatus {
    #[default]
    Available,
    Reserved,
    Sold,
    OnHold,
}

/// Primitive drawn by a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Circle,
    Polygon,
    Line,
    Arrow,
}

/// Contact details of an exhibitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Company occupying a booth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExhibitorInfo {
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
}

/// Booth size labels shown to visitors, e.g. `10' x 10'` / `3m x 3m`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoothDimensions {
    pub imperial: String,
    pub metric: String,
}

/// Booth data: number, occupancy and the exhibitor renting it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoothDetail {
    /// Human-readable booth number, e.g. `"A101"`.
    pub number: String,
    pub status: BoothStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<BoothDimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exhibitor: Option<ExhibitorInfo>,
}

/// Free text label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDetail {
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub align: String,
    pub font_style: String,
}

/// Drawn primitive: walls, aisles, outlines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeDetail {
    pub shape_type: ShapeType,
    /// Flat `x, y` vertex list for polygons, lines and arrows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
}

/// Placed bitmap, optionally cropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDetail {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_height: Option<f64>,
}

/// Door or entrance and the way it opens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorDetail {
    pub furniture_type: String,
    pub direction: String,
}

/// Tables, chairs and other fixtures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FurnitureDetail {
    pub furniture_type: String,
}

/// Decorative plant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantDetail {
    pub plant_type: String,
}

/// Variant-specific data, tagged by `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementDetail {
    Booth(BoothDetail),
    Text(TextDetail),
    Shape(ShapeDetail),
    Image(ImageDetail),
    Door(DoorDetail),
    Furniture(FurnitureDetail),
    Plant(PlantDetail),
}

impl ElementDetail {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Booth(_) => ElementKind::Booth,
            Self::Text(_) => ElementKind::Text,
            Self::Shape(_) => ElementKind::Shape,
            Self::Image(_) => ElementKind::Image,
            Self::Door(_) => ElementKind::Door,
            Self::Furniture(_) => ElementKind::Furniture,
            Self::Plant(_) => ElementKind::Plant,
        }
    }
}

/// Value stored in an element's open `custom_properties` bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

fn default_fill() -> String {
    "#E8E4DC".to_owned()
}

fn default_stroke() -> String {
    "#1F1A17".to_owned()
}

fn default_stroke_width() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_grid_size() -> f64 {
    DEFAULT_GRID_SIZE
}

/// An element as stored in the document and in saved floor plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier, assigned on creation and never changed.
    pub id: ElementId,
    /// Left edge of the bounding box.
    pub x: f64,
    /// Top edge of the bounding box.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees. Display-only; routing uses the unrotated box.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_fill")]
    pub fill: String,
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_true")]
    pub draggable: bool,
    /// Mirror of membership in the store's selection set.
    #[serde(default)]
    pub selected: bool,
    /// Z-order sort key. Not contiguous, not unique.
    #[serde(default)]
    pub layer: i64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_properties: BTreeMap<String, PropValue>,
    #[serde(flatten)]
    pub detail: ElementDetail,
}

impl Element {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.detail.kind()
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    #[must_use]
    pub fn is_booth(&self) -> bool {
        matches!(self.detail, ElementDetail::Booth(_))
    }

    /// Booth data, if this element is a booth.
    #[must_use]
    pub fn as_booth(&self) -> Option<&BoothDetail> {
        match &self.detail {
            ElementDetail::Booth(booth) => Some(booth),
            _ => None,
        }
    }
}

/// An element that has not been added to a store yet.
///
/// `layer` is optional; the store puts a draft without one on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDraft {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_fill")]
    pub fill: String,
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_true")]
    pub draggable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_properties: BTreeMap<String, PropValue>,
    #[serde(flatten)]
    pub detail: ElementDetail,
}

impl ElementDraft {
    /// Draft with default styling covering `bounds`.
    #[must_use]
    pub fn new(detail: ElementDetail, bounds: Rect) -> Self {
        Self {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            rotation: 0.0,
            fill: default_fill(),
            stroke: default_stroke(),
            stroke_width: default_stroke_width(),
            draggable: true,
            layer: None,
            custom_properties: BTreeMap::new(),
            detail,
        }
    }

    /// Available booth with the given number.
    #[must_use]
    pub fn booth(number: &str, bounds: Rect) -> Self {
        Self::new(ElementDetail::Booth(BoothDetail { number: number.to_owned(), ..BoothDetail::default() }), bounds)
    }

    #[must_use]
    pub fn with_layer(mut self, layer: i64) -> Self {
        self.layer = Some(layer);
        self
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn into_element(self, id: ElementId, layer: i64) -> Element {
        Element {
            id,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
            fill: self.fill,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
            draggable: self.draggable,
            selected: false,
            layer,
            custom_properties: self.custom_properties,
            detail: self.detail,
        }
    }
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    /// Custom property keys to merge; a `null` value removes the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_properties: Option<BTreeMap<String, Option<PropValue>>>,
    /// Replacement variant data. Must be of the element's own kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ElementDetail>,
}

impl ElementPatch {
    /// Patch that moves an element to `(x, y)`.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    /// Apply to `target`. On error `target` may be partially modified, so
    /// callers patch a copy.
    fn apply_to(&self, target: &mut Element) -> Result<(), PlanError> {
        if let Some(ref detail) = self.detail {
            if detail.kind() != target.kind() {
                return Err(PlanError::KindMismatch { incoming: detail.kind(), current: target.kind() });
            }
            target.detail = detail.clone();
        }
        if let Some(x) = self.x {
            target.x = x;
        }
        if let Some(y) = self.y {
            target.y = y;
        }
        if let Some(w) = self.width {
            target.width = w;
        }
        if let Some(h) = self.height {
            target.height = h;
        }
        if let Some(r) = self.rotation {
            target.rotation = r;
        }
        if let Some(layer) = self.layer {
            target.layer = layer;
        }
        if let Some(ref fill) = self.fill {
            target.fill.clone_from(fill);
        }
        if let Some(ref stroke) = self.stroke {
            target.stroke.clone_from(stroke);
        }
        if let Some(sw) = self.stroke_width {
            target.stroke_width = sw;
        }
        if let Some(d) = self.draggable {
            target.draggable = d;
        }
        if let Some(ref props) = self.custom_properties {
            for (k, v) in props {
                match v {
                    Some(v) => {
                        target.custom_properties.insert(k.clone(), v.clone());
                    }
                    None => {
                        target.custom_properties.remove(k);
                    }
                }
            }
        }
        validate_bounds(target.bounds())
    }
}

/// Serializable document: canvas settings plus the element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    #[serde(default)]
    pub canvas_size: Size,
    /// Grid spacing; routing uses it as the cell size unless overridden.
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub flooring: Flooring,
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self {
            canvas_size: Size::default(),
            grid_size: DEFAULT_GRID_SIZE,
            elements: Vec::new(),
            flooring: Flooring::default(),
        }
    }
}

/// Floor shading drawn under the plan.
///
/// Flooring shapes are kept apart from the element list: they are never
/// selected, hit-tested or treated as obstacles by routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flooring {
    pub enabled: bool,
    /// Display opacity in `0.0..=1.0`.
    pub opacity: f64,
    /// Shape elements only.
    pub elements: Vec<Element>,
}

impl Default for Flooring {
    fn default() -> Self {
        Self { enabled: false, opacity: DEFAULT_FLOORING_OPACITY, elements: Vec::new() }
    }
}

/// What one history step restores.
#[derive(Debug, Clone, Default, PartialEq)]
struct Snapshot {
    elements: Vec<Element>,
    flooring: Vec<Element>,
}

/// Z-order operations applied to a batch of elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOp {
    /// Raise each element's layer by one.
    BringForward,
    /// Lower each element's layer by one, never below 0.
    SendBackward,
    /// Move every element to one above the current maximum layer.
    BringToFront,
    /// Move every element to one below the current minimum layer.
    SendToBack,
}

fn validate_bounds(bounds: Rect) -> Result<(), PlanError> {
    if bounds.is_valid() {
        Ok(())
    } else {
        Err(PlanError::InvalidGeometry { x: bounds.x, y: bounds.y, width: bounds.width, height: bounds.height })
    }
}

fn validate_flooring(detail: &ElementDetail, bounds: Rect) -> Result<(), PlanError> {
    if detail.kind() != ElementKind::Shape {
        return Err(PlanError::KindMismatch { incoming: detail.kind(), current: ElementKind::Shape });
    }
    validate_bounds(bounds)
}

/// Keep valid, uniquely identified shapes; clamp the opacity.
fn load_flooring(mut flooring: Flooring) -> Flooring {
    let mut seen = HashSet::new();
    flooring.elements.retain(|element| {
        if let Err(e) = validate_flooring(&element.detail, element.bounds()) {
            warn!(id = %element.id, error = %e, "skipping flooring shape on load");
            return false;
        }
        seen.insert(element.id.clone())
    });
    for element in &mut flooring.elements {
        element.selected = false;
    }
    flooring.opacity = if flooring.opacity.is_finite() { flooring.opacity.clamp(0.0, 1.0) } else { DEFAULT_FLOORING_OPACITY };
    flooring
}

fn new_id() -> ElementId {
    Uuid::new_v4().to_string()
}

/// In-memory store of floor-plan elements with selection and undo history.
#[derive(Debug)]
pub struct DocStore {
    elements: Vec<Element>,
    selection: BTreeSet<ElementId>,
    history: History<Snapshot>,
    flooring: Flooring,
    canvas_size: Size,
    grid_size: f64,
}

impl DocStore {
    /// Create an empty store with the default canvas and history depth.
    #[must_use]
    pub fn new() -> Self {
        Self::with_history(History::new())
    }

    /// Create an empty store keeping at most `depth` undo steps.
    #[must_use]
    pub fn with_history_depth(depth: usize) -> Self {
        Self::with_history(History::with_depth(depth))
    }

    fn with_history(history: History<Snapshot>) -> Self {
        Self {
            elements: Vec::new(),
            selection: BTreeSet::new(),
            history,
            flooring: Flooring::default(),
            canvas_size: Size::default(),
            grid_size: DEFAULT_GRID_SIZE,
        }
    }

    // --- Element mutations ---

    /// Add a new element. It receives a fresh id and becomes the only
    /// selected element. Invalid drafts are logged and dropped.
    pub fn add(&mut self, draft: ElementDraft) -> Option<Element> {
        if let Err(e) = validate_bounds(draft.bounds()) {
            warn!(error = %e, "dropping element draft");
            return None;
        }
        let layer = draft.layer.unwrap_or_else(|| self.next_layer());
        let element = draft.into_element(new_id(), layer);
        let id = element.id.clone();

        let mut next = self.elements.clone();
        next.push(element);
        self.commit(next);
        self.set_selection(std::iter::once(id.clone()));
        debug!(%id, "element added");
        self.get(&id).cloned()
    }

    /// Add an element from an untyped JSON draft, e.g. one built by a toolbar.
    pub fn add_json(&mut self, draft: serde_json::Value) -> Option<Element> {
        match serde_json::from_value::<ElementDraft>(draft) {
            Ok(draft) => self.add(draft),
            Err(e) => {
                let e = PlanError::InvalidDraft(e.to_string());
                warn!(error = %e, "dropping element draft");
                None
            }
        }
    }

    /// Merge `patch` into an element. Returns `false` if the id is unknown or
    /// the patch is rejected.
    pub fn update(&mut self, id: &str, patch: &ElementPatch) -> bool {
        match self.try_update(id, patch) {
            Ok(changed) => changed,
            Err(e) => {
                warn!(%id, error = %e, "update ignored");
                false
            }
        }
    }

    fn try_update(&mut self, id: &str, patch: &ElementPatch) -> Result<bool, PlanError> {
        let idx = self.index_of(id).ok_or_else(|| PlanError::ElementNotFound(id.to_owned()))?;
        let mut updated = self.elements[idx].clone();
        patch.apply_to(&mut updated)?;
        if updated == self.elements[idx] {
            return Ok(false);
        }
        let mut next = self.elements.clone();
        next[idx] = updated;
        self.commit(next);
        Ok(true)
    }

    /// Remove every element whose id is in `ids`. Unknown ids are skipped.
    /// Returns the number of elements removed.
    pub fn delete(&mut self, ids: &[ElementId]) -> usize {
        let doomed: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let next: Vec<Element> = self
            .elements
            .iter()
            .filter(|e| !doomed.contains(e.id.as_str()))
            .cloned()
            .collect();
        let removed = self.elements.len() - next.len();
        if removed == 0 {
            debug!(?ids, "delete matched no elements");
            return 0;
        }
        self.commit(next);
        self.selection.retain(|id| !doomed.contains(id.as_str()));
        removed
    }

    /// Clone every matching element, offset by [`DUPLICATE_OFFSET`] on both
    /// axes. The clones become the selection. Returns the new ids.
    pub fn duplicate(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let clones: Vec<Element> = self
            .elements
            .iter()
            .filter(|e| wanted.contains(e.id.as_str()))
            .map(|e| Element {
                id: new_id(),
                x: e.x + DUPLICATE_OFFSET,
                y: e.y + DUPLICATE_OFFSET,
                selected: false,
                ..e.clone()
            })
            .collect();
        if clones.is_empty() {
            debug!(?ids, "duplicate matched no elements");
            return Vec::new();
        }
        let new_ids: Vec<ElementId> = clones.iter().map(|e| e.id.clone()).collect();
        let mut next = self.elements.clone();
        next.extend(clones);
        self.commit(next);
        self.set_selection(new_ids.iter().cloned());
        new_ids
    }

    /// Change the z-order of the matching elements.
    ///
    /// Front/back targets are computed once over the whole document before
    /// any element moves, so a batch lands on a single layer value.
    pub fn reorder(&mut self, ids: &[ElementId], op: ReorderOp) -> bool {
        let targets: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let max_layer = self.elements.iter().map(|e| e.layer).max().unwrap_or(0);
        let min_layer = self.elements.iter().map(|e| e.layer).min().unwrap_or(0);

        let mut next = self.elements.clone();
        for element in next.iter_mut().filter(|e| targets.contains(e.id.as_str())) {
            element.layer = match op {
                ReorderOp::BringForward => element.layer.saturating_add(1),
                ReorderOp::SendBackward if element.layer > 0 => element.layer - 1,
                ReorderOp::SendBackward => element.layer,
                ReorderOp::BringToFront => max_layer.saturating_add(1),
                ReorderOp::SendToBack => min_layer.saturating_sub(1),
            };
        }
        if next == self.elements {
            debug!(?ids, ?op, "reorder changed nothing");
            return false;
        }
        self.commit(next);
        true
    }

    // --- Booth operations ---

    /// Renumber every booth in insertion order as `{prefix}{n}`, starting at
    /// `start`. Returns how many booths were numbered.
    pub fn generate_booth_numbers(&mut self, start: u32, prefix: &str) -> usize {
        let mut next = self.elements.clone();
        let mut count = 0usize;
        for (n, element) in (start..).zip(next.iter_mut().filter(|e| e.is_booth())) {
            if let ElementDetail::Booth(ref mut booth) = element.detail {
                booth.number = format!("{prefix}{n}");
                count += 1;
            }
        }
        if next != self.elements {
            self.commit(next);
        }
        count
    }

    /// Set a booth's occupancy status.
    pub fn update_booth_status(&mut self, id: &str, status: BoothStatus) -> bool {
        self.edit_booth(id, |booth| booth.status = status)
    }

    /// Attach exhibitor metadata to a booth.
    pub fn update_booth_exhibitor(&mut self, id: &str, exhibitor: ExhibitorInfo) -> bool {
        self.edit_booth(id, move |booth| booth.exhibitor = Some(exhibitor))
    }

    fn edit_booth(&mut self, id: &str, edit: impl FnOnce(&mut BoothDetail)) -> bool {
        match self.try_edit_booth(id, edit) {
            Ok(changed) => changed,
            Err(e) => {
                warn!(%id, error = %e, "booth edit ignored");
                false
            }
        }
    }

    fn try_edit_booth(&mut self, id: &str, edit: impl FnOnce(&mut BoothDetail)) -> Result<bool, PlanError> {
        let idx = self.index_of(id).ok_or_else(|| PlanError::ElementNotFound(id.to_owned()))?;
        let mut next = self.elements.clone();
        let ElementDetail::Booth(ref mut booth) = next[idx].detail else {
            return Err(PlanError::NotABooth(id.to_owned()));
        };
        edit(booth);
        if next == self.elements {
            return Ok(false);
        }
        self.commit(next);
        Ok(true)
    }

    // --- Selection ---

    /// Replace the selection. Unknown ids are dropped. Not undoable.
    pub fn select(&mut self, ids: &[ElementId]) {
        let known: Vec<ElementId> = ids
            .iter()
            .filter(|id| {
                let exists = self.index_of(id).is_some();
                if !exists {
                    debug!(%id, "ignoring selection of unknown element");
                }
                exists
            })
            .cloned()
            .collect();
        self.set_selection(known);
    }

    /// Clear the selection.
    pub fn deselect_all(&mut self) {
        self.set_selection(std::iter::empty());
    }

    fn set_selection(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.selection = ids.into_iter().collect();
        self.mirror_selection();
    }

    fn mirror_selection(&mut self) {
        for element in &mut self.elements {
            element.selected = self.selection.contains(&element.id);
        }
    }

    // --- History ---

    /// Restore the element and flooring lists from before the last edit.
    /// Selection is kept, minus ids that no longer exist.
    pub fn undo(&mut self) -> bool {
        let mut live = self.take_snapshot();
        let stepped = self.history.undo(&mut live);
        self.put_snapshot(live);
        if !stepped {
            debug!("nothing to undo");
            return false;
        }
        self.prune_selection();
        true
    }

    /// Re-apply the last undone edit.
    pub fn redo(&mut self) -> bool {
        let mut live = self.take_snapshot();
        let stepped = self.history.redo(&mut live);
        self.put_snapshot(live);
        if !stepped {
            debug!("nothing to redo");
            return false;
        }
        self.prune_selection();
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn prune_selection(&mut self) {
        let live: HashSet<&str> = self.elements.iter().map(|e| e.id.as_str()).collect();
        self.selection.retain(|id| live.contains(id.as_str()));
        self.mirror_selection();
    }

    /// Swap in `next` as the live element list, recording the old one.
    fn commit(&mut self, next: Vec<Element>) {
        let elements = std::mem::replace(&mut self.elements, next);
        self.history.record(Snapshot { elements, flooring: self.flooring.elements.clone() });
    }

    /// Swap in `next` as the live flooring list, recording the old one.
    fn commit_flooring(&mut self, next: Vec<Element>) {
        let flooring = std::mem::replace(&mut self.flooring.elements, next);
        self.history.record(Snapshot { elements: self.elements.clone(), flooring });
    }

    fn take_snapshot(&mut self) -> Snapshot {
        Snapshot {
            elements: std::mem::take(&mut self.elements),
            flooring: std::mem::take(&mut self.flooring.elements),
        }
    }

    fn put_snapshot(&mut self, snapshot: Snapshot) {
        self.elements = snapshot.elements;
        self.flooring.elements = snapshot.flooring;
    }

    // --- Flooring ---

    /// Add a shape to the flooring layer. Only shape drafts are accepted.
    /// Flooring is not selectable, so the selection is left alone.
    pub fn add_flooring(&mut self, draft: ElementDraft) -> Option<Element> {
        if let Err(e) = validate_flooring(&draft.detail, draft.bounds()) {
            warn!(error = %e, "dropping flooring draft");
            return None;
        }
        let layer = draft.layer.unwrap_or(0);
        let element = draft.into_element(new_id(), layer);
        let mut next = self.flooring.elements.clone();
        next.push(element.clone());
        self.commit_flooring(next);
        debug!(id = %element.id, "flooring added");
        Some(element)
    }

    /// Merge `patch` into a flooring shape. Returns `false` if the id is
    /// unknown or the patch is rejected.
    pub fn update_flooring(&mut self, id: &str, patch: &ElementPatch) -> bool {
        match self.try_update_flooring(id, patch) {
            Ok(changed) => changed,
            Err(e) => {
                warn!(%id, error = %e, "flooring update ignored");
                false
            }
        }
    }

    fn try_update_flooring(&mut self, id: &str, patch: &ElementPatch) -> Result<bool, PlanError> {
        let idx = self
            .flooring
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| PlanError::ElementNotFound(id.to_owned()))?;
        let mut updated = self.flooring.elements[idx].clone();
        patch.apply_to(&mut updated)?;
        if updated == self.flooring.elements[idx] {
            return Ok(false);
        }
        let mut next = self.flooring.elements.clone();
        next[idx] = updated;
        self.commit_flooring(next);
        Ok(true)
    }

    /// Remove a flooring shape. Returns `false` for an unknown id.
    pub fn delete_flooring(&mut self, id: &str) -> bool {
        let next: Vec<Element> = self.flooring.elements.iter().filter(|e| e.id != id).cloned().collect();
        if next.len() == self.flooring.elements.len() {
            debug!(%id, "flooring delete matched nothing");
            return false;
        }
        self.commit_flooring(next);
        true
    }

    /// Show or hide the flooring layer. Not undoable.
    pub fn set_flooring_enabled(&mut self, enabled: bool) {
        self.flooring.enabled = enabled;
    }

    /// Set the flooring opacity, clamped to `0.0..=1.0`. Not undoable.
    pub fn set_flooring_opacity(&mut self, opacity: f64) {
        if opacity.is_finite() {
            self.flooring.opacity = opacity.clamp(0.0, 1.0);
        } else {
            warn!(opacity, "ignoring non-finite flooring opacity");
        }
    }

    #[must_use]
    pub fn flooring(&self) -> &Flooring {
        &self.flooring
    }

    // --- Document lifecycle ---

    /// Replace the whole document. Selection and history are cleared.
    /// Elements with invalid geometry or a duplicate id are dropped.
    pub fn load(&mut self, plan: FloorPlan) {
        let mut seen = HashSet::new();
        let mut elements = Vec::with_capacity(plan.elements.len());
        for mut element in plan.elements {
            if let Err(e) = validate_bounds(element.bounds()) {
                warn!(id = %element.id, error = %e, "skipping element on load");
                continue;
            }
            if !seen.insert(element.id.clone()) {
                warn!(id = %element.id, "skipping duplicate element id on load");
                continue;
            }
            element.selected = false;
            elements.push(element);
        }
        self.elements = elements;
        self.flooring = load_flooring(plan.flooring);
        self.selection.clear();
        self.history.clear();
        self.set_canvas_size(plan.canvas_size);
        self.set_grid_size(plan.grid_size);
        info!(elements = self.elements.len(), flooring = self.flooring.elements.len(), "floor plan loaded");
    }

    /// Snapshot of the document in its serializable shape.
    #[must_use]
    pub fn to_floor_plan(&self) -> FloorPlan {
        FloorPlan {
            canvas_size: self.canvas_size,
            grid_size: self.grid_size,
            elements: self.elements.clone(),
            flooring: self.flooring.clone(),
        }
    }

    /// Remove all elements and forget selection and history. The flooring
    /// layer is kept.
    pub fn reset(&mut self) {
        self.elements.clear();
        self.selection.clear();
        self.history.clear();
        info!("document reset");
    }

    pub fn set_canvas_size(&mut self, size: Size) {
        if size.is_valid() {
            self.canvas_size = size;
        } else {
            warn!(?size, "ignoring invalid canvas size");
        }
    }

    pub fn set_grid_size(&mut self, grid_size: f64) {
        if grid_size.is_finite() && grid_size > 0.0 {
            self.grid_size = grid_size;
        } else {
            warn!(grid_size, "ignoring invalid grid size");
        }
    }

    // --- Queries ---

    /// Look up an element by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// All elements in insertion order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// All elements in draw order: ascending layer, ties by insertion order.
    #[must_use]
    pub fn sorted_elements(&self) -> Vec<&Element> {
        let mut sorted: Vec<&Element> = self.elements.iter().collect();
        sorted.sort_by_key(|e| e.layer);
        sorted
    }

    /// Ids of the selected elements, in id order.
    #[must_use]
    pub fn selection(&self) -> Vec<ElementId> {
        self.selection.iter().cloned().collect()
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Booths in insertion order.
    pub fn booths(&self) -> impl Iterator<Item = (&Element, &BoothDetail)> {
        self.elements.iter().filter_map(|e| e.as_booth().map(|b| (e, b)))
    }

    /// Find a booth by element id or, failing that, by booth number.
    #[must_use]
    pub fn find_booth(&self, id_or_number: &str) -> Option<&Element> {
        self.booths()
            .find(|(e, _)| e.id == id_or_number)
            .or_else(|| self.booths().find(|(_, b)| b.number == id_or_number))
            .map(|(e, _)| e)
    }

    /// Case-insensitive search over booth numbers and exhibitor name,
    /// description and category. An empty term matches nothing.
    #[must_use]
    pub fn search_booths(&self, term: &str) -> Vec<ElementId> {
        if term.is_empty() {
            return Vec::new();
        }
        let needle = term.to_lowercase();
        let hit = |s: &str| s.to_lowercase().contains(&needle);
        self.booths()
            .filter(|(_, booth)| {
                hit(&booth.number)
                    || booth.exhibitor.as_ref().is_some_and(|ex| {
                        hit(&ex.company_name)
                            || ex.description.as_deref().is_some_and(hit)
                            || ex.category.as_deref().is_some_and(hit)
                    })
            })
            .map(|(e, _)| e.id.clone())
            .collect()
    }

    /// Booths whose exhibitor category equals `category` exactly.
    #[must_use]
    pub fn booths_by_category(&self, category: &str) -> Vec<ElementId> {
        if category.is_empty() {
            return Vec::new();
        }
        self.booths()
            .filter(|(_, booth)| {
                booth
                    .exhibitor
                    .as_ref()
                    .and_then(|ex| ex.category.as_deref())
                    == Some(category)
            })
            .map(|(e, _)| e.id.clone())
            .collect()
    }

    #[must_use]
    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    #[must_use]
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Number of elements currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the store contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn next_layer(&self) -> i64 {
        self.elements.iter().map(|e| e.layer).max().map_or(0, |max| max.saturating_add(1))
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}
