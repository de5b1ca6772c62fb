use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    mem,
    rc::{Rc, Weak},
};

use shared::{
    domain::{PointId, PointType, TripPoint},
    error::TripError,
    protocol::{FilterType, SortType, UpdateType, ViewAction},
};
use tracing::{debug, warn};
use trip_model::{visible_points, Catalog, Clock, FilterModel, PointsModel, SubscriptionId};

use crate::{
    new_point_presenter::NewPointPresenter,
    point_presenter::{Mode, PointPresenter},
    render::{Place, Renderer, Slot, View, ViewHandle},
    DataChangeHandler, DestroyHandler, ModeChangeHandler, ViewContext,
};

/// Payload of a notification from either model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChange {
    Point(TripPoint),
    Filter(FilterType),
}

pub struct BoardDeps {
    pub renderer: Rc<dyn Renderer>,
    pub catalog: Rc<Catalog>,
    pub clock: Rc<dyn Clock>,
    pub points_model: Rc<PointsModel>,
    pub filter_model: Rc<FilterModel>,
    pub default_point_type: PointType,
}

#[derive(Debug, Default)]
struct Subscriptions {
    points: Option<SubscriptionId>,
    filter: Option<SubscriptionId>,
}

/// Owns the presenters of the visible points and keeps them in step with
/// the points model, the active filter and the active sort.
pub struct BoardPresenter {
    ctx: ViewContext,
    points_model: Rc<PointsModel>,
    filter_model: Rc<FilterModel>,
    sort_type: Rc<Cell<SortType>>,
    point_presenters: RefCell<BTreeMap<PointId, Rc<PointPresenter>>>,
    new_point_presenter: Rc<NewPointPresenter>,
    on_data_change: DataChangeHandler,
    on_mode_change: ModeChangeHandler,
    new_point_button: Cell<Option<ViewHandle>>,
    sort_component: Cell<Option<ViewHandle>>,
    list_component: Cell<Option<ViewHandle>>,
    message_component: Cell<Option<ViewHandle>>,
    is_creating: Cell<bool>,
    subscriptions: RefCell<Subscriptions>,
}

impl BoardPresenter {
    pub fn new(deps: BoardDeps) -> Rc<Self> {
        let ctx = ViewContext {
            renderer: deps.renderer,
            catalog: deps.catalog,
            clock: deps.clock,
        };

        let board = Rc::new_cyclic(|weak: &Weak<BoardPresenter>| {
            let on_data_change: DataChangeHandler = {
                let weak = weak.clone();
                Rc::new(move |action, update_type| match weak.upgrade() {
                    Some(board) => board.handle_view_action(action, update_type),
                    None => Ok(()),
                })
            };
            let on_mode_change: ModeChangeHandler = {
                let weak = weak.clone();
                Rc::new(move || {
                    if let Some(board) = weak.upgrade() {
                        board.handle_mode_change();
                    }
                })
            };
            let on_new_point_destroy: DestroyHandler = {
                let weak = weak.clone();
                Rc::new(move || {
                    if let Some(board) = weak.upgrade() {
                        board.handle_new_point_destroy();
                    }
                })
            };

            BoardPresenter {
                new_point_presenter: Rc::new(NewPointPresenter::new(
                    ctx.clone(),
                    deps.default_point_type,
                    Rc::clone(&on_data_change),
                    on_new_point_destroy,
                )),
                ctx,
                points_model: deps.points_model,
                filter_model: deps.filter_model,
                sort_type: Rc::new(Cell::new(SortType::default())),
                point_presenters: RefCell::new(BTreeMap::new()),
                on_data_change,
                on_mode_change,
                new_point_button: Cell::new(None),
                sort_component: Cell::new(None),
                list_component: Cell::new(None),
                message_component: Cell::new(None),
                is_creating: Cell::new(false),
                subscriptions: RefCell::new(Subscriptions::default()),
            }
        });

        let weak = Rc::downgrade(&board);
        let points = board.points_model.subscribe(move |update_type, point| {
            if let Some(board) = weak.upgrade() {
                board.handle_model_event(update_type, ModelChange::Point(point.clone()));
            }
        });
        let weak = Rc::downgrade(&board);
        let filter = board.filter_model.subscribe(move |update_type, filter| {
            if let Some(board) = weak.upgrade() {
                board.handle_model_event(update_type, ModelChange::Filter(*filter));
            }
        });
        *board.subscriptions.borrow_mut() = Subscriptions {
            points: Some(points),
            filter: Some(filter),
        };

        board
    }

    /// Visible points: the active filter applied to the model, then ordered
    /// by the active sort. Recomputed on every call.
    pub fn points(&self) -> Vec<TripPoint> {
        visible_points(
            &self.points_model.points(),
            self.filter_model.filter(),
            self.sort_type.get(),
            self.ctx.clock.now(),
        )
    }

    pub fn init(&self) {
        let button = self.ctx.renderer.mount(
            View::NewPointButton { disabled: false },
            Slot::Controls,
            Place::Append,
        );
        self.new_point_button.set(Some(button));
        self.render_board();
    }

    pub fn sort_type(&self) -> SortType {
        self.sort_type.get()
    }

    pub fn is_creating(&self) -> bool {
        self.is_creating.get()
    }

    pub fn presenter(&self, id: PointId) -> Option<Rc<PointPresenter>> {
        self.point_presenters.borrow().get(&id).cloned()
    }

    pub fn presenter_ids(&self) -> Vec<PointId> {
        self.point_presenters.borrow().keys().copied().collect()
    }

    pub fn new_point_presenter(&self) -> Rc<NewPointPresenter> {
        Rc::clone(&self.new_point_presenter)
    }

    /// Number of open forms across the board, edit and creation alike.
    pub fn open_editor_count(&self) -> usize {
        let editing = self
            .point_presenters
            .borrow()
            .values()
            .filter(|presenter| presenter.mode() == Mode::Editing)
            .count();
        editing + usize::from(self.new_point_presenter.is_active())
    }

    pub fn has_message(&self) -> bool {
        self.message_component.get().is_some()
    }

    pub fn has_sort(&self) -> bool {
        self.sort_component.get().is_some()
    }

    /// Raised by the sort control; ignored while no control is mounted.
    pub fn handle_sort_type_change(&self, sort_type: SortType) {
        if self.sort_type.get() == sort_type || self.sort_component.get().is_none() {
            return;
        }
        debug!(%sort_type, "sort changed");
        self.sort_type.set(sort_type);
        self.clear_points();
        let points = self.points();
        self.render_sort(!points.is_empty());
        self.render_points(points);
    }

    /// Single entry point for presenter actions. The update type is the
    /// presenter's call.
    pub fn handle_view_action(
        &self,
        action: ViewAction,
        update_type: UpdateType,
    ) -> Result<(), TripError> {
        let kind = action.kind();
        debug!(action = %kind, %update_type, "view action");
        let result = match action {
            ViewAction::CreatePoint(draft) => self.points_model.add(update_type, draft).map(|_| ()),
            ViewAction::UpdatePoint(point) => self.points_model.update(update_type, point),
            ViewAction::DeletePoint(point) => {
                self.points_model.delete(update_type, &point).map(|_| ())
            }
        };
        if let Err(error) = &result {
            warn!(action = %kind, %error, "view action rejected");
        }
        result
    }

    /// Single entry point for notifications from both models.
    pub fn handle_model_event(&self, update_type: UpdateType, change: ModelChange) {
        match update_type {
            UpdateType::Patch => {
                let ModelChange::Point(point) = change else {
                    return;
                };
                match self.presenter(point.id) {
                    Some(presenter) => presenter.init(point),
                    None => debug!(point_id = %point.id, "patch for point outside the board"),
                }
            }
            UpdateType::Minor => {
                self.clear_board(false);
                self.render_board();
            }
            UpdateType::Major => {
                self.clear_board(true);
                self.render_board();
            }
        }
    }

    /// Called by a presenter about to open its form: every other form closes.
    pub fn handle_mode_change(&self) {
        let presenters: Vec<Rc<PointPresenter>> =
            self.point_presenters.borrow().values().cloned().collect();
        for presenter in presenters {
            presenter.reset_view();
        }
        self.new_point_presenter.destroy();
    }

    pub fn handle_new_point_button_click(&self) {
        if self.is_creating.get() {
            return;
        }
        self.is_creating.set(true);
        self.sort_type.set(SortType::default());
        self.filter_model
            .set_filter(UpdateType::Major, FilterType::Everything);
        self.set_new_point_button_disabled(true);
        self.new_point_presenter.init();
    }

    fn handle_new_point_destroy(&self) {
        self.is_creating.set(false);
        self.set_new_point_button_disabled(false);
        if self.points().is_empty() {
            self.remove_sort();
            self.render_message();
        }
    }

    /// Unsubscribes from both models and unmounts everything the board owns.
    pub fn teardown(&self) {
        let subscriptions = mem::take(&mut *self.subscriptions.borrow_mut());
        if let Some(id) = subscriptions.points {
            self.points_model.unsubscribe(id);
        }
        if let Some(id) = subscriptions.filter {
            self.filter_model.unsubscribe(id);
        }

        self.new_point_presenter.destroy();
        self.clear_board(false);
        for component in [
            &self.sort_component,
            &self.list_component,
            &self.message_component,
            &self.new_point_button,
        ] {
            if let Some(handle) = component.take() {
                self.ctx.renderer.unmount(handle);
            }
        }
    }

    fn render_board(&self) {
        let points = self.points();
        if points.is_empty() && !self.is_creating.get() {
            self.remove_sort();
            self.render_message();
            return;
        }

        self.render_sort(!points.is_empty());
        self.render_list();
        self.render_points(points);
    }

    fn clear_board(&self, reset_sort_type: bool) {
        self.clear_points();
        if let Some(message) = self.message_component.take() {
            self.ctx.renderer.unmount(message);
        }
        if reset_sort_type {
            self.sort_type.set(SortType::default());
        }
    }

    fn clear_points(&self) {
        let presenters = mem::take(&mut *self.point_presenters.borrow_mut());
        debug!(count = presenters.len(), "clearing point presenters");
        for presenter in presenters.into_values() {
            presenter.destroy();
        }
    }

    fn render_sort(&self, enabled: bool) {
        let view = View::Sort {
            active: self.sort_type.get(),
            enabled,
        };
        let handle = match self.sort_component.take() {
            Some(previous) => self.ctx.renderer.replace(view, previous),
            None => self.ctx.renderer.mount(view, Slot::Board, Place::Prepend),
        };
        self.sort_component.set(Some(handle));
    }

    fn remove_sort(&self) {
        if let Some(sort) = self.sort_component.take() {
            self.ctx.renderer.unmount(sort);
        }
    }

    fn render_list(&self) {
        if self.list_component.get().is_none() {
            let handle = self
                .ctx
                .renderer
                .mount(View::EventList, Slot::Board, Place::Append);
            self.list_component.set(Some(handle));
        }
    }

    fn render_points(&self, points: Vec<TripPoint>) {
        debug!(count = points.len(), "rendering points");
        for point in points {
            self.render_point(point);
        }
    }

    fn render_point(&self, point: TripPoint) {
        let presenter = Rc::new(PointPresenter::new(
            self.ctx.clone(),
            Rc::clone(&self.filter_model),
            Rc::clone(&self.sort_type),
            Rc::clone(&self.on_data_change),
            Rc::clone(&self.on_mode_change),
        ));
        let id = point.id;
        presenter.init(point);
        self.point_presenters.borrow_mut().insert(id, presenter);
    }

    fn render_message(&self) {
        if let Some(previous) = self.message_component.take() {
            self.ctx.renderer.unmount(previous);
        }
        let handle = self.ctx.renderer.mount(
            View::Message {
                filter: self.filter_model.filter(),
            },
            Slot::Board,
            Place::Append,
        );
        self.message_component.set(Some(handle));
    }

    fn set_new_point_button_disabled(&self, disabled: bool) {
        if let Some(button) = self.new_point_button.get() {
            self.ctx
                .renderer
                .update(button, View::NewPointButton { disabled });
        }
    }
}

#[cfg(test)]
#[path = "tests/board_presenter_tests.rs"]
mod tests;
