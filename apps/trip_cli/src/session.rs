use std::rc::Rc;

use anyhow::Context;
use board::{BoardDeps, BoardPresenter, FormInput, MemoryRenderer, NewPointPresenter, PointPresenter};
use chrono::{DateTime, Utc};
use shared::{
    domain::{OfferId, PointId, PointType, TripPoint},
    error::TripError,
    protocol::{FilterType, SortType},
};
use tracing::info;
use trip_model::{Catalog, Clock, DestinationsModel, FilterModel, OffersModel, PointsModel};

use crate::seed::SeedData;

#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub point_type: PointType,
    pub destination: String,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub base_price: u32,
    pub offers: Vec<OfferId>,
}

#[derive(Debug, Clone, Default)]
pub struct EditRequest {
    pub base_price: Option<u32>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

/// A board wired to an in-memory renderer. Every change goes through the
/// same presenters a user would drive.
pub struct Session {
    renderer: Rc<MemoryRenderer>,
    catalog: Rc<Catalog>,
    points_model: Rc<PointsModel>,
    board: Rc<BoardPresenter>,
}

impl Session {
    pub fn new(
        seed: &SeedData,
        default_point_type: PointType,
        filter: FilterType,
        clock: Rc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let renderer = Rc::new(MemoryRenderer::new());
        let catalog = Rc::new(Catalog::new(
            DestinationsModel::new(seed.destinations.clone()),
            OffersModel::new(seed.offers.clone()),
        ));
        let points_model = Rc::new(
            PointsModel::new(seed.points.clone(), Rc::clone(&catalog))
                .context("trip data holds an invalid point")?,
        );
        let board = BoardPresenter::new(BoardDeps {
            renderer: renderer.clone(),
            catalog: Rc::clone(&catalog),
            clock,
            points_model: Rc::clone(&points_model),
            filter_model: Rc::new(FilterModel::new(filter)),
            default_point_type,
        });
        board.init();

        Ok(Self {
            renderer,
            catalog,
            points_model,
            board,
        })
    }

    pub fn sort(&self, sort_type: SortType) {
        self.board.handle_sort_type_change(sort_type);
    }

    pub fn create(&self, request: CreateRequest) -> Result<TripPoint, TripError> {
        if self.catalog.destinations.by_name(&request.destination).is_none() {
            return Err(TripError::UnknownDestination(request.destination));
        }

        self.board.handle_new_point_button_click();
        let form = self.board.new_point_presenter();
        if let Err(error) = fill_creation_form(&form, &request).and_then(|()| form.submit()) {
            form.cancel();
            return Err(error);
        }

        let created = self
            .points_model
            .points()
            .into_iter()
            .max_by_key(|point| point.id)
            .ok_or_else(|| TripError::InvalidPoint("created point is missing".into()))?;
        info!(point_id = %created.id, "point created");
        Ok(created)
    }

    pub fn delete(&self, id: PointId) -> Result<(), TripError> {
        let presenter = self.presenter(id)?;
        presenter.open_editor();
        presenter.request_delete()?;
        info!(point_id = %id, "point deleted");
        Ok(())
    }

    pub fn edit(&self, id: PointId, request: EditRequest) -> Result<(), TripError> {
        let presenter = self.presenter(id)?;
        presenter.open_editor();
        if let Err(error) = fill_edit_form(&presenter, &request).and_then(|()| presenter.submit()) {
            presenter.close_editor();
            return Err(error);
        }
        info!(point_id = %id, "point updated");
        Ok(())
    }

    pub fn points(&self) -> Vec<TripPoint> {
        self.points_model.points()
    }

    pub fn snapshot(&self) -> String {
        self.renderer.render_text()
    }

    fn presenter(&self, id: PointId) -> Result<Rc<PointPresenter>, TripError> {
        self.board.presenter(id).ok_or_else(|| TripError::not_found(id))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.board.teardown();
    }
}

fn fill_creation_form(form: &NewPointPresenter, request: &CreateRequest) -> Result<(), TripError> {
    form.input(FormInput::Type(request.point_type))?;
    form.input(FormInput::Destination(request.destination.clone()))?;
    form.input(FormInput::DateFrom(request.date_from))?;
    form.input(FormInput::DateTo(request.date_to))?;
    form.input(FormInput::BasePrice(request.base_price))?;
    for offer in &request.offers {
        form.input(FormInput::ToggleOffer(*offer))?;
    }
    Ok(())
}

fn fill_edit_form(presenter: &PointPresenter, request: &EditRequest) -> Result<(), TripError> {
    if let Some(price) = request.base_price {
        presenter.input(FormInput::BasePrice(price))?;
    }
    match (request.date_from, request.date_to) {
        (Some(from), Some(to)) => {
            // Moving both bounds past the old end has to widen the end first.
            if presenter.input(FormInput::DateFrom(from)).is_err() {
                presenter.input(FormInput::DateTo(to))?;
                presenter.input(FormInput::DateFrom(from))?;
            } else {
                presenter.input(FormInput::DateTo(to))?;
            }
        }
        (Some(from), None) => presenter.input(FormInput::DateFrom(from))?,
        (None, Some(to)) => presenter.input(FormInput::DateTo(to))?,
        (None, None) => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use trip_model::FixedClock;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 8, 0, 0).unwrap()
    }

    fn seed() -> SeedData {
        serde_json::from_str(
            r#"{
                "points": [
                    {"id": 1, "type": "train", "destination": 1,
                     "date_from": "2026-07-02T09:00:00Z", "date_to": "2026-07-02T11:00:00Z",
                     "base_price": 60},
                    {"id": 2, "type": "flight", "destination": 2,
                     "date_from": "2026-06-20T09:00:00Z", "date_to": "2026-06-20T12:00:00Z",
                     "base_price": 300}
                ],
                "destinations": [{"id": 1, "name": "Vienna"}, {"id": 2, "name": "Prague"}],
                "offers": [{"type": "flight", "offers": [{"id": 9, "title": "Add meal", "price": 15}]}]
            }"#,
        )
        .expect("seed")
    }

    fn session(filter: FilterType) -> Session {
        Session::new(
            &seed(),
            PointType::Flight,
            filter,
            Rc::new(FixedClock::new(now())),
        )
        .expect("session")
    }

    #[test]
    fn snapshot_lists_points_by_start() {
        let session = session(FilterType::Everything);
        let text = session.snapshot();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "[New event]");
        assert_eq!(lines[1], "Sort: (day) time price ");
        assert_eq!(lines[2], "Events:");
        assert!(lines[3].starts_with("  #2 Flight Prague"));
        assert!(lines[4].starts_with("  #1 Train Vienna"));
    }

    #[test]
    fn empty_filter_prints_message() {
        let session = session(FilterType::Present);
        assert_eq!(session.snapshot(), "[New event]\nThere are no present events now");
    }

    #[test]
    fn sorting_an_empty_result_keeps_only_the_message() {
        let session = session(FilterType::Present);

        session.sort(SortType::Price);

        assert_eq!(session.snapshot(), "[New event]\nThere are no present events now");
    }

    #[test]
    fn sorting_reorders_rows() {
        let session = session(FilterType::Everything);

        session.sort(SortType::Price);

        let text = session.snapshot();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "Sort: day time (price) ");
        assert!(lines[3].starts_with("  #2 "));
    }

    #[test]
    fn invalid_seed_is_rejected_with_context() {
        let mut seed = seed();
        let duplicate = seed.points[0].clone();
        seed.points.push(duplicate);

        let err = Session::new(
            &seed,
            PointType::Flight,
            FilterType::Everything,
            Rc::new(FixedClock::new(now())),
        )
        .err()
        .expect("duplicate id");

        assert!(err.to_string().contains("invalid point"));
        assert!(format!("{err:#}").contains("duplicate point id 1"));
    }

    #[test]
    fn create_goes_through_the_creation_form() {
        let session = session(FilterType::Everything);

        let created = session
            .create(CreateRequest {
                point_type: PointType::Flight,
                destination: "vienna".into(),
                date_from: now() + Duration::days(3),
                date_to: now() + Duration::days(3) + Duration::hours(2),
                base_price: 210,
                offers: vec![OfferId(9)],
            })
            .expect("create");

        assert_eq!(created.id, PointId(3));
        assert!(created.offers.contains(&OfferId(9)));
        assert_eq!(session.points().len(), 3);
        assert!(!session.snapshot().contains("<New>"));
        assert!(session.snapshot().starts_with("[New event]\n"));
    }

    #[test]
    fn create_with_unknown_destination_is_rejected() {
        let session = session(FilterType::Everything);

        let err = session
            .create(CreateRequest {
                point_type: PointType::Taxi,
                destination: "Atlantis".into(),
                date_from: now(),
                date_to: now(),
                base_price: 1,
                offers: Vec::new(),
            })
            .expect_err("unknown destination");

        assert!(matches!(err, TripError::UnknownDestination(_)));
        assert_eq!(session.points().len(), 2);
    }

    #[test]
    fn rejected_create_closes_the_form() {
        let session = session(FilterType::Everything);

        let err = session
            .create(CreateRequest {
                point_type: PointType::Taxi,
                destination: "Vienna".into(),
                date_from: now(),
                date_to: now() + Duration::hours(1),
                base_price: 1,
                offers: vec![OfferId(9)],
            })
            .expect_err("meal is a flight offer");

        assert!(matches!(err, TripError::UnknownOffer { .. }));
        assert!(!session.snapshot().contains("(disabled)"));
        assert!(!session.snapshot().contains("<New>"));
    }

    #[test]
    fn delete_removes_point() {
        let session = session(FilterType::Everything);

        session.delete(PointId(2)).expect("delete");

        assert_eq!(session.points().len(), 1);
        assert!(!session.snapshot().contains("#2 "));
    }

    #[test]
    fn edit_moves_both_dates_past_the_old_end() {
        let session = session(FilterType::Everything);
        let from = Utc.with_ymd_and_hms(2026, 7, 5, 9, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 7, 5, 10, 0, 0).unwrap();

        session
            .edit(
                PointId(1),
                EditRequest {
                    base_price: Some(75),
                    date_from: Some(from),
                    date_to: Some(to),
                },
            )
            .expect("edit");

        let point = session
            .points()
            .into_iter()
            .find(|p| p.id == PointId(1))
            .expect("point 1");
        assert_eq!((point.date_from, point.date_to, point.base_price), (from, to, 75));
        assert!(!session.snapshot().contains("<Edit>"));
    }

    #[test]
    fn unknown_or_hidden_point_is_not_found() {
        let session = session(FilterType::Future);

        assert!(session.delete(PointId(2)).expect_err("past point").is_not_found());
        assert!(session
            .edit(PointId(42), EditRequest::default())
            .expect_err("no such point")
            .is_not_found());
    }
}
