use std::cell::RefCell;

use shared::{
    domain::PointType,
    error::TripError,
    protocol::{UpdateType, ViewAction},
};
use tracing::debug;

use crate::{
    form::{FormInput, PointForm},
    render::{FormKind, Place, Slot, View, ViewHandle},
    DataChangeHandler, DestroyHandler, ViewContext,
};

#[derive(Debug, Default)]
struct NewPointState {
    form: Option<PointForm>,
    component: Option<ViewHandle>,
}

/// Creation form mounted at the top of the event list.
pub struct NewPointPresenter {
    ctx: ViewContext,
    default_point_type: PointType,
    on_data_change: DataChangeHandler,
    on_destroy: DestroyHandler,
    state: RefCell<NewPointState>,
}

impl NewPointPresenter {
    pub fn new(
        ctx: ViewContext,
        default_point_type: PointType,
        on_data_change: DataChangeHandler,
        on_destroy: DestroyHandler,
    ) -> Self {
        Self {
            ctx,
            default_point_type,
            on_data_change,
            on_destroy,
            state: RefCell::new(NewPointState::default()),
        }
    }

    pub fn init(&self) {
        let mut state = self.state.borrow_mut();
        if state.component.is_some() {
            return;
        }
        let form = PointForm::blank(self.default_point_type);
        let card = form.card(FormKind::Create, &self.ctx.catalog);
        state.component = Some(
            self.ctx
                .renderer
                .mount(View::Form(card), Slot::EventList, Place::Prepend),
        );
        state.form = Some(form);
        debug!(point_type = %self.default_point_type, "creation form opened");
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().component.is_some()
    }

    pub fn form(&self) -> Option<PointForm> {
        self.state.borrow().form.clone()
    }

    pub fn component(&self) -> Option<ViewHandle> {
        self.state.borrow().component
    }

    pub fn input(&self, input: FormInput) -> Result<(), TripError> {
        let mut state = self.state.borrow_mut();
        let Some(form) = state.form.as_mut() else {
            return Ok(());
        };
        if !form.apply(input, &self.ctx.catalog)? {
            return Ok(());
        }
        let card = form.card(FormKind::Create, &self.ctx.catalog);
        if let Some(previous) = state.component.take() {
            state.component = Some(self.ctx.renderer.replace(View::Form(card), previous));
        }
        Ok(())
    }

    /// Issues the CREATE action and closes the form. A rejected draft
    /// leaves the form open.
    pub fn submit(&self) -> Result<(), TripError> {
        let draft = {
            let state = self.state.borrow();
            let Some(form) = state.form.as_ref() else {
                return Ok(());
            };
            form.to_draft(&self.ctx.catalog)?
        };
        (self.on_data_change)(ViewAction::CreatePoint(draft), UpdateType::Minor)?;
        self.destroy();
        Ok(())
    }

    pub fn cancel(&self) {
        self.destroy();
    }

    /// Unmounts the form and reports completion once; later calls do nothing.
    pub fn destroy(&self) {
        let component = {
            let mut state = self.state.borrow_mut();
            state.form = None;
            state.component.take()
        };
        let Some(component) = component else {
            return;
        };
        self.ctx.renderer.unmount(component);
        (self.on_destroy)();
    }
}
