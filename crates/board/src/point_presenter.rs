use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use chrono::{DateTime, Utc};
use shared::{
    domain::TripPoint,
    error::TripError,
    protocol::{FilterType, SortType, UpdateType, ViewAction},
};
use tracing::debug;
use trip_model::{filter, sort, FilterModel};

use crate::{
    form::{FormInput, PointForm},
    render::{FormKind, PointCard, Place, Slot, View, ViewHandle},
    DataChangeHandler, ModeChangeHandler, ViewContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Default,
    Editing,
}

/// MINOR when the edit can move the point in or out of the active filter or
/// change its place under the active sort, PATCH otherwise.
pub fn edit_update_type(
    before: &TripPoint,
    after: &TripPoint,
    filter_type: FilterType,
    sort_type: SortType,
    now: DateTime<Utc>,
) -> UpdateType {
    let membership_changed = filter_type != FilterType::Everything
        && filter::matches(filter_type, before, now) != filter::matches(filter_type, after, now);
    if membership_changed || sort::sort_key_changed(sort_type, before, after) {
        UpdateType::Minor
    } else {
        UpdateType::Patch
    }
}

pub fn point_card(point: &TripPoint, ctx: &ViewContext) -> PointCard {
    PointCard {
        point: point.clone(),
        destination_name: ctx
            .catalog
            .destinations
            .by_id(point.destination)
            .map(|d| d.name.clone()),
        offers: ctx
            .catalog
            .offers
            .by_type(point.point_type)
            .iter()
            .filter(|offer| point.offers.contains(&offer.id))
            .cloned()
            .collect(),
    }
}

#[derive(Debug)]
struct PointState {
    mode: Mode,
    point: Option<TripPoint>,
    form: Option<PointForm>,
    point_component: Option<ViewHandle>,
    edit_component: Option<ViewHandle>,
}

/// Row of one visible point, switching between its card and its edit form.
///
/// Only one of the two components is mounted at a time. No `RefCell` borrow
/// is held while calling back into the board, which may re-initialize or
/// destroy this presenter from inside the callback.
pub struct PointPresenter {
    ctx: ViewContext,
    filter_model: Rc<FilterModel>,
    sort_type: Rc<Cell<SortType>>,
    on_data_change: DataChangeHandler,
    on_mode_change: ModeChangeHandler,
    state: RefCell<PointState>,
    destroyed: Cell<bool>,
}

impl PointPresenter {
    pub fn new(
        ctx: ViewContext,
        filter_model: Rc<FilterModel>,
        sort_type: Rc<Cell<SortType>>,
        on_data_change: DataChangeHandler,
        on_mode_change: ModeChangeHandler,
    ) -> Self {
        Self {
            ctx,
            filter_model,
            sort_type,
            on_data_change,
            on_mode_change,
            state: RefCell::new(PointState {
                mode: Mode::Default,
                point: None,
                form: None,
                point_component: None,
                edit_component: None,
            }),
            destroyed: Cell::new(false),
        }
    }

    /// Renders the card for `point` in place of whatever this presenter
    /// currently shows; an open form is discarded.
    pub fn init(&self, point: TripPoint) {
        if self.destroyed.get() {
            return;
        }
        let view = View::Point(point_card(&point, &self.ctx));
        let renderer = &self.ctx.renderer;
        let mut state = self.state.borrow_mut();

        let handle = match (state.point_component.take(), state.edit_component.take()) {
            (Some(previous), _) | (None, Some(previous)) => renderer.replace(view, previous),
            (None, None) => renderer.mount(view, Slot::EventList, Place::Append),
        };
        state.point_component = Some(handle);
        state.point = Some(point);
        state.form = None;
        state.mode = Mode::Default;
    }

    pub fn mode(&self) -> Mode {
        self.state.borrow().mode
    }

    pub fn point(&self) -> Option<TripPoint> {
        self.state.borrow().point.clone()
    }

    pub fn form(&self) -> Option<PointForm> {
        self.state.borrow().form.clone()
    }

    pub fn component(&self) -> Option<ViewHandle> {
        let state = self.state.borrow();
        state.point_component.or(state.edit_component)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Rollup click on the card: closes every other editor, then opens this one.
    pub fn open_editor(&self) {
        if self.destroyed.get() || self.mode() == Mode::Editing {
            return;
        }
        (self.on_mode_change)();

        let catalog = &self.ctx.catalog;
        let mut state = self.state.borrow_mut();
        let (Some(point), Some(previous)) = (state.point.clone(), state.point_component.take())
        else {
            return;
        };
        let form = PointForm::for_point(&point);
        let handle = self
            .ctx
            .renderer
            .replace(View::Form(form.card(FormKind::Edit, catalog)), previous);
        state.edit_component = Some(handle);
        state.form = Some(form);
        state.mode = Mode::Editing;
        debug!(point_id = %point.id, "editor opened");
    }

    /// Rollup click or Escape inside the form.
    pub fn close_editor(&self) {
        self.reset_view();
    }

    /// Returns to the card, dropping unsaved form changes.
    pub fn reset_view(&self) {
        let mut state = self.state.borrow_mut();
        if state.mode != Mode::Editing {
            return;
        }
        let (Some(point), Some(previous)) = (state.point.clone(), state.edit_component.take())
        else {
            return;
        };
        let handle = self
            .ctx
            .renderer
            .replace(View::Point(point_card(&point, &self.ctx)), previous);
        state.point_component = Some(handle);
        state.form = None;
        state.mode = Mode::Default;
    }

    pub fn input(&self, input: FormInput) -> Result<(), TripError> {
        let mut state = self.state.borrow_mut();
        let Some(form) = state.form.as_mut() else {
            return Ok(());
        };
        if !form.apply(input, &self.ctx.catalog)? {
            return Ok(());
        }
        let card = form.card(FormKind::Edit, &self.ctx.catalog);
        if let Some(previous) = state.edit_component.take() {
            state.edit_component = Some(self.ctx.renderer.replace(View::Form(card), previous));
        }
        Ok(())
    }

    /// Saves the form. On failure the form stays open with its input.
    pub fn submit(&self) -> Result<(), TripError> {
        let (before, updated) = {
            let state = self.state.borrow();
            let (Some(before), Some(form), Mode::Editing) =
                (state.point.as_ref(), state.form.as_ref(), state.mode)
            else {
                return Ok(());
            };
            (before.clone(), form.to_point(&self.ctx.catalog)?)
        };

        let update_type = edit_update_type(
            &before,
            &updated,
            self.filter_model.filter(),
            self.sort_type.get(),
            self.ctx.clock.now(),
        );
        (self.on_data_change)(ViewAction::UpdatePoint(updated.clone()), update_type)?;

        // A PATCH notification has already re-rendered the card and a MINOR
        // one has destroyed this presenter.
        if !self.destroyed.get() && self.mode() == Mode::Editing {
            self.init(updated);
        }
        Ok(())
    }

    pub fn request_delete(&self) -> Result<(), TripError> {
        let Some(point) = self.point() else {
            return Ok(());
        };
        (self.on_data_change)(ViewAction::DeletePoint(point), UpdateType::Minor)
    }

    pub fn toggle_favorite(&self) -> Result<(), TripError> {
        let Some(mut point) = self.point() else {
            return Ok(());
        };
        point.is_favorite = !point.is_favorite;
        (self.on_data_change)(ViewAction::UpdatePoint(point), UpdateType::Patch)
    }

    pub fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        let mut state = self.state.borrow_mut();
        for handle in [state.point_component.take(), state.edit_component.take()]
            .into_iter()
            .flatten()
        {
            self.ctx.renderer.unmount(handle);
        }
        state.form = None;
    }
}

#[cfg(test)]
#[path = "tests/point_presenter_tests.rs"]
mod tests;
