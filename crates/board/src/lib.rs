//! Presenter layer of the trip board: the board coordinator, one presenter
//! per visible point and the transient creation form.

pub mod board_presenter;
pub mod form;
pub mod new_point_presenter;
pub mod point_presenter;
pub mod render;

use std::rc::Rc;

use shared::{error::TripError, protocol::{UpdateType, ViewAction}};
use trip_model::{Catalog, Clock};

pub use board_presenter::{BoardDeps, BoardPresenter, ModelChange};
pub use form::{FormInput, PointForm};
pub use new_point_presenter::NewPointPresenter;
pub use point_presenter::{Mode, PointPresenter};
pub use render::{MemoryRenderer, Place, Renderer, Slot, View, ViewHandle};

/// Routes a presenter's action to the models.
pub type DataChangeHandler = Rc<dyn Fn(ViewAction, UpdateType) -> Result<(), TripError>>;
/// Raised by a presenter about to open its editor.
pub type ModeChangeHandler = Rc<dyn Fn()>;
pub type DestroyHandler = Rc<dyn Fn()>;

/// Collaborators every presenter renders with.
#[derive(Clone)]
pub struct ViewContext {
    pub renderer: Rc<dyn Renderer>,
    pub catalog: Rc<Catalog>,
    pub clock: Rc<dyn Clock>,
}
