//! Rendering contract consumed by the presenters, and an in-memory renderer
//! that keeps the mounted tree for tests and textual output.

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use chrono::{DateTime, Utc};
use shared::{
    domain::{Destination, Offer, OfferId, PointId, PointType, TripPoint},
    protocol::{FilterType, SortType},
};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewHandle(pub u64);

/// Containers the board mounts into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// Header area holding the add trigger.
    Controls,
    /// Sort control, event list and empty-state message.
    Board,
    /// Inside the event list: point rows and forms.
    EventList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Place {
    Prepend,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Edit,
    Create,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointCard {
    pub point: TripPoint,
    pub destination_name: Option<String>,
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormCard {
    pub kind: FormKind,
    pub point_id: Option<PointId>,
    pub point_type: PointType,
    pub destination: Option<Destination>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub base_price: u32,
    pub available_offers: Vec<Offer>,
    pub selected_offers: BTreeSet<OfferId>,
    pub destination_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    NewPointButton { disabled: bool },
    Sort { active: SortType, enabled: bool },
    EventList,
    Message { filter: FilterType },
    Point(PointCard),
    Form(FormCard),
}

impl View {
    pub fn point_id(&self) -> Option<PointId> {
        match self {
            View::Point(card) => Some(card.point.id),
            View::Form(card) => card.point_id,
            _ => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::NewPointButton { disabled } => {
                write!(f, "[New event]{}", if *disabled { " (disabled)" } else { "" })
            }
            View::Sort { active, enabled } => {
                write!(f, "Sort: ")?;
                for sort in SortType::ALL {
                    if sort == *active {
                        write!(f, "({sort}) ")?;
                    } else {
                        write!(f, "{sort} ")?;
                    }
                }
                if !enabled {
                    write!(f, "[disabled]")?;
                }
                Ok(())
            }
            View::EventList => write!(f, "Events:"),
            View::Message { filter } => write!(f, "{}", filter.empty_message()),
            View::Point(card) => {
                let point = &card.point;
                write!(
                    f,
                    "#{} {} {} {} - {} ({}m) EUR {}",
                    point.id,
                    point.point_type.label(),
                    card.destination_name.as_deref().unwrap_or("?"),
                    point.date_from.format("%d/%m/%y %H:%M"),
                    point.date_to.format("%d/%m/%y %H:%M"),
                    point.duration().num_minutes(),
                    point.base_price,
                )?;
                for offer in &card.offers {
                    write!(f, " +{} EUR {}", offer.title, offer.price)?;
                }
                if point.is_favorite {
                    write!(f, " *")?;
                }
                Ok(())
            }
            View::Form(card) => {
                let title = match card.kind {
                    FormKind::Edit => "Edit",
                    FormKind::Create => "New",
                };
                let format_date = |date: Option<DateTime<Utc>>| {
                    date.map(|d| d.format("%d/%m/%y %H:%M").to_string())
                        .unwrap_or_else(|| "--".into())
                };
                write!(
                    f,
                    "<{title}> {} {} {} - {} EUR {} offers: {}/{}",
                    card.point_type.label(),
                    card.destination.as_ref().map(|d| d.name.as_str()).unwrap_or("?"),
                    format_date(card.date_from),
                    format_date(card.date_to),
                    card.base_price,
                    card.selected_offers.len(),
                    card.available_offers.len(),
                )
            }
        }
    }
}

/// Mount primitives the presenters render through. Every mounted view
/// must eventually be unmounted by its owner.
pub trait Renderer {
    fn mount(&self, view: View, slot: Slot, place: Place) -> ViewHandle;
    /// Puts `view` at `old`'s position; `old` is unmounted.
    fn replace(&self, view: View, old: ViewHandle) -> ViewHandle;
    /// Redraws the view behind `handle` in place; the handle stays valid.
    fn update(&self, handle: ViewHandle, view: View);
    fn unmount(&self, handle: ViewHandle);
}

#[derive(Debug, Default)]
struct MountedTree {
    next_handle: u64,
    slots: BTreeMap<Slot, Vec<(ViewHandle, View)>>,
}

impl MountedTree {
    fn allocate(&mut self) -> ViewHandle {
        self.next_handle += 1;
        ViewHandle(self.next_handle)
    }

    fn locate(&self, handle: ViewHandle) -> Option<(Slot, usize)> {
        self.slots.iter().find_map(|(slot, views)| {
            views
                .iter()
                .position(|(existing, _)| *existing == handle)
                .map(|index| (*slot, index))
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryRenderer {
    tree: RefCell<MountedTree>,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self, slot: Slot) -> Vec<View> {
        self.tree
            .borrow()
            .slots
            .get(&slot)
            .map(|views| views.iter().map(|(_, view)| view.clone()).collect())
            .unwrap_or_default()
    }

    pub fn handles(&self, slot: Slot) -> Vec<ViewHandle> {
        self.tree
            .borrow()
            .slots
            .get(&slot)
            .map(|views| views.iter().map(|(handle, _)| *handle).collect())
            .unwrap_or_default()
    }

    pub fn view(&self, handle: ViewHandle) -> Option<View> {
        let tree = self.tree.borrow();
        let (slot, index) = tree.locate(handle)?;
        tree.slots.get(&slot).map(|views| views[index].1.clone())
    }

    pub fn is_mounted(&self, handle: ViewHandle) -> bool {
        self.tree.borrow().locate(handle).is_some()
    }

    pub fn mounted_count(&self) -> usize {
        self.tree.borrow().slots.values().map(Vec::len).sum()
    }

    /// Lines of the mounted tree, event list rows nested under the list.
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();
        for view in self.views(Slot::Controls) {
            lines.push(view.to_string());
        }
        for view in self.views(Slot::Board) {
            lines.push(view.to_string());
            if view == View::EventList {
                for row in self.views(Slot::EventList) {
                    lines.push(format!("  {row}"));
                }
            }
        }
        lines.join("\n")
    }
}

impl Renderer for MemoryRenderer {
    fn mount(&self, view: View, slot: Slot, place: Place) -> ViewHandle {
        let mut tree = self.tree.borrow_mut();
        let handle = tree.allocate();
        let views = tree.slots.entry(slot).or_default();
        match place {
            Place::Prepend => views.insert(0, (handle, view)),
            Place::Append => views.push((handle, view)),
        }
        handle
    }

    fn replace(&self, view: View, old: ViewHandle) -> ViewHandle {
        let mut tree = self.tree.borrow_mut();
        let handle = tree.allocate();
        match tree.locate(old) {
            Some((slot, index)) => {
                if let Some(views) = tree.slots.get_mut(&slot) {
                    views[index] = (handle, view);
                }
            }
            None => warn!(handle = old.0, "replace target is not mounted"),
        }
        handle
    }

    fn update(&self, handle: ViewHandle, view: View) {
        let mut tree = self.tree.borrow_mut();
        match tree.locate(handle) {
            Some((slot, index)) => {
                if let Some(views) = tree.slots.get_mut(&slot) {
                    views[index].1 = view;
                }
            }
            None => warn!(handle = handle.0, "update target is not mounted"),
        }
    }

    fn unmount(&self, handle: ViewHandle) {
        let mut tree = self.tree.borrow_mut();
        if let Some((slot, index)) = tree.locate(handle) {
            if let Some(views) = tree.slots.get_mut(&slot) {
                views.remove(index);
            }
        }
    }
}
