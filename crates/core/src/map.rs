//! Map-state reconciliation.
//!
//! The marker set is never stored as independent state. It is computed from the places on
//! screen, the current selection and the pending draft place by the pure functions in this
//! module, then pushed to a [`MapWidget`] by [`MapReconciler`]. The widget is whatever
//! actually draws; this module only decides what it should show and what a click means.

use crate::constants::{DEFAULT_CENTER, DEFAULT_ZOOM, DIMMED_OPACITY, DRAFT_CENTER};
use crate::selection::Selection;
use terrace_types::{Coordinates, DraftPlace, Place, PlaceId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: u8,
}

impl Viewport {
    pub fn new(center: Coordinates, zoom: u8) -> Self {
        Self { center, zoom }
    }
}

/// What a marker stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKey {
    /// A persisted place in browse mode.
    Place(PlaceId),
    /// A committed draft place, by position in the draft.
    Committed(usize),
    /// The place currently being edited in the draft.
    Pending,
}

/// The outcome of a click on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapAction {
    Select(PlaceId),
    EditCommitted(usize),
    /// A click on empty map area.
    Background(Coordinates),
}

/// A raw click as reported by the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapClick {
    Marker(MarkerKey),
    Background(Coordinates),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub key: MarkerKey,
    pub position: Coordinates,
    pub title: String,
    pub opacity: f32,
    pub interactive: bool,
    pub selected: bool,
    /// Action fired when an interactive marker is clicked.
    pub action: Option<MapAction>,
}

/// One marker per place, each selecting its place when clicked.
pub fn browse_markers(places: &[Place], selection: &Selection) -> Vec<MarkerSpec> {
    places
        .iter()
        .map(|place| MarkerSpec {
            key: MarkerKey::Place(place.id),
            position: place.coordinates(),
            title: place.name.clone(),
            opacity: 1.0,
            interactive: true,
            selected: selection.selected() == Some(place.id),
            action: Some(MapAction::Select(place.id)),
        })
        .collect()
}

/// Committed places, plus the pending place if one is open.
///
/// While a place is pending the committed markers are dimmed and ignore clicks, so the
/// only way out of the pending editor is through its own controls.
pub fn draft_markers(committed: &[DraftPlace], pending: Option<&DraftPlace>) -> Vec<MarkerSpec> {
    let editing = pending.is_some();
    let mut markers: Vec<MarkerSpec> = committed
        .iter()
        .enumerate()
        .map(|(i, place)| MarkerSpec {
            key: MarkerKey::Committed(i),
            position: place.coordinates(),
            title: place.name.clone(),
            opacity: if editing { DIMMED_OPACITY } else { 1.0 },
            interactive: !editing,
            selected: false,
            action: (!editing).then_some(MapAction::EditCommitted(i)),
        })
        .collect();

    if let Some(place) = pending {
        markers.push(MarkerSpec {
            key: MarkerKey::Pending,
            position: place.coordinates(),
            title: place.name.clone(),
            opacity: 1.0,
            interactive: false,
            selected: true,
            action: None,
        });
    }
    markers
}

/// Centre on the first place, or on the default centre when there are none.
pub fn browse_viewport(places: &[Place]) -> Viewport {
    match places.first() {
        Some(place) => Viewport::new(place.coordinates(), DEFAULT_ZOOM),
        None => Viewport::new(
            Coordinates::unchecked(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            DEFAULT_ZOOM,
        ),
    }
}

pub fn draft_viewport() -> Viewport {
    Viewport::new(
        Coordinates::unchecked(DRAFT_CENTER.0, DRAFT_CENTER.1),
        DEFAULT_ZOOM,
    )
}

/// Drawing surface the reconciler drives.
pub trait MapWidget {
    /// Create the underlying view. Called at most once per reconciler.
    fn create_view(&mut self, viewport: &Viewport);
    fn set_view(&mut self, viewport: &Viewport);
    fn clear_markers(&mut self);
    fn add_marker(&mut self, marker: &MarkerSpec);
}

/// Applies marker specs and viewports to a [`MapWidget`].
#[derive(Debug)]
pub struct MapReconciler<W> {
    widget: W,
    mounted: bool,
    viewport: Option<Viewport>,
    markers: Vec<MarkerSpec>,
}

impl<W: MapWidget> MapReconciler<W> {
    pub fn new(widget: W) -> Self {
        Self {
            widget,
            mounted: false,
            viewport: None,
            markers: Vec::new(),
        }
    }

    /// Creates the view once. Returns false, doing nothing, if it already exists.
    pub fn mount(&mut self, initial: Viewport) -> bool {
        if self.mounted {
            tracing::debug!("map view already mounted");
            return false;
        }
        self.widget.create_view(&initial);
        self.mounted = true;
        self.viewport = Some(initial);
        true
    }

    /// Brings the widget in line with `viewport` and `markers`.
    ///
    /// A changed marker set is torn down and rebuilt in full. Rendering the same set twice
    /// leaves the widget untouched. Returns true if the widget was changed.
    pub fn render(&mut self, viewport: Viewport, markers: Vec<MarkerSpec>) -> bool {
        let mut changed = self.mount(viewport);

        if self.viewport != Some(viewport) {
            self.widget.set_view(&viewport);
            self.viewport = Some(viewport);
            changed = true;
        }

        if self.markers != markers {
            self.widget.clear_markers();
            for marker in &markers {
                self.widget.add_marker(marker);
            }
            tracing::debug!("rendered {} markers", markers.len());
            self.markers = markers;
            changed = true;
        }
        changed
    }

    /// Resolves a click to an action. Clicks on non-interactive or unknown markers do nothing.
    pub fn click(&self, click: MapClick) -> Option<MapAction> {
        match click {
            MapClick::Background(at) => Some(MapAction::Background(at)),
            MapClick::Marker(key) => self
                .markers
                .iter()
                .find(|m| m.key == key)
                .filter(|m| m.interactive)
                .and_then(|m| m.action),
        }
    }

    pub fn markers(&self) -> &[MarkerSpec] {
        &self.markers
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }
}
