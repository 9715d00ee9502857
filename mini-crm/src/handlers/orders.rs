use crate::models::forms::{FieldErrors, OrderFormInput};
use crate::models::{CurrentUser, UserProfile};
use crate::utils::{format_eur, format_percent};
use crate::widgets::ConfirmModal;
use crate::AppState;
use anyhow::anyhow;
use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use crm_core::error::AppError;
use data_access::{Order, UpdateOrder};

const ORDERS_PATH: &str = "/orders";

/// One table row, preformatted for display.
pub struct OrderRow {
    pub id: i64,
    pub customer: String,
    pub nb_days: i32,
    pub tjm: String,
    pub taux_tva: String,
    pub total_ht: String,
    pub total_ttc: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            customer: order.customer.clone(),
            nb_days: order.nb_days,
            tjm: format_eur(order.tjm),
            taux_tva: format_percent(order.taux_tva),
            total_ht: format_eur(order.total_ht),
            total_ttc: format_eur(order.total_ttc),
        }
    }
}

#[derive(Template)]
#[template(path = "orders/list.html")]
pub struct OrderListTemplate {
    pub user: UserProfile,
    pub current_page: &'static str,
    pub rows: Vec<OrderRow>,
    pub loading: bool,
    pub error: Option<String>,
    pub modal: Option<ConfirmModal>,
}

#[derive(Template)]
#[template(path = "orders/form.html")]
pub struct OrderFormTemplate {
    pub user: UserProfile,
    pub current_page: &'static str,
    pub title: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub values: OrderFormInput,
    pub errors: FieldErrors,
    pub error: Option<String>,
    pub total_ht: String,
    pub total_ttc: String,
}

impl OrderFormTemplate {
    fn add(user: UserProfile, values: OrderFormInput) -> Self {
        Self::build(user, "New order", ORDERS_PATH.to_string() + "/add", "Create", values)
    }

    fn edit(user: UserProfile, id: i64, values: OrderFormInput) -> Self {
        Self::build(user, "Edit order", format!("{}/edit/{}", ORDERS_PATH, id), "Save", values)
    }

    fn build(
        user: UserProfile,
        title: &'static str,
        action: String,
        submit_label: &'static str,
        values: OrderFormInput,
    ) -> Self {
        let (total_ht, total_ttc) = match values.preview_totals() {
            Some(totals) => (format_eur(totals.total_ht), format_eur(totals.total_ttc)),
            None => ("-".to_string(), "-".to_string()),
        };
        Self {
            user,
            current_page: "orders",
            title,
            action,
            submit_label,
            values,
            errors: FieldErrors::default(),
            error: None,
            total_ht,
            total_ttc,
        }
    }

    fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }

    fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

async fn render_list(state: &AppState, user: UserProfile, delete_id: Option<i64>) -> Response {
    if let Err(e) = state.orders.load(false).await {
        tracing::warn!(error = %e, "Rendering order list with load error");
    }

    let snapshot = state.orders.snapshot();
    let modal = delete_id
        .and_then(|id| snapshot.orders.iter().find(|order| order.id == id))
        .map(ConfirmModal::delete_order);

    OrderListTemplate {
        user,
        current_page: "orders",
        rows: snapshot.orders.iter().map(OrderRow::from).collect(),
        loading: snapshot.loading,
        error: snapshot.error,
        modal,
    }
    .into_response()
}

pub async fn list_orders(State(state): State<AppState>, user: CurrentUser) -> Response {
    render_list(&state, user.profile, None).await
}

/// The list page with the delete confirmation open.
pub async fn confirm_delete_page(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Response {
    render_list(&state, user.profile, Some(id)).await
}

pub async fn delete_order_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Redirect {
    // A failure is left in the store and shown by the list page
    if let Err(e) = state.orders.delete(id).await {
        tracing::warn!(order_id = id, user_id = user.user_id, error = %e, "Order deletion failed");
    }
    Redirect::to(ORDERS_PATH)
}

pub async fn add_order_page(user: CurrentUser) -> impl IntoResponse {
    OrderFormTemplate::add(user.profile, OrderFormInput::default())
}

pub async fn add_order_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(input): Form<OrderFormInput>,
) -> Response {
    let fields = match input.validate_fields() {
        Ok(fields) => fields,
        Err(errors) => {
            let page = OrderFormTemplate::add(user.profile, input).with_errors(errors);
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state.orders.create(fields.into_create()).await {
        Ok(()) => Redirect::to(ORDERS_PATH).into_response(),
        Err(e) => {
            let page = OrderFormTemplate::add(user.profile, input).with_error(e.to_string());
            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}

fn parse_order_id(raw: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id != 0 => Ok(id),
        _ => Err(AppError::BadRequest(anyhow!("Missing order id"))),
    }
}

pub async fn edit_order_page(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_order_id(&raw_id)?;

    if let Err(e) = state.orders.load(false).await {
        tracing::warn!(order_id = id, error = %e, "Could not load orders for edit");
    }

    match state.orders.find_by_id(id) {
        Some(order) => {
            let draft = UpdateOrder::from(order);
            let values = OrderFormInput::from(&draft);
            Ok(OrderFormTemplate::edit(user.profile, id, values).into_response())
        }
        None => match state.orders.error() {
            Some(message) => Err(AppError::BadGateway(message)),
            None => Err(AppError::NotFound(anyhow!("Order not found"))),
        },
    }
}

pub async fn edit_order_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_id): Path<String>,
    Form(input): Form<OrderFormInput>,
) -> Result<Response, AppError> {
    let id = parse_order_id(&raw_id)?;

    let fields = match input.validate_fields() {
        Ok(fields) => fields,
        Err(errors) => {
            let page = OrderFormTemplate::edit(user.profile, id, input).with_errors(errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    match state.orders.update(fields.into_update(id)).await {
        Ok(()) => Ok(Redirect::to(ORDERS_PATH).into_response()),
        Err(e) => {
            let page = OrderFormTemplate::edit(user.profile, id, input).with_error(e.to_string());
            Ok((StatusCode::BAD_GATEWAY, page).into_response())
        }
    }
}
