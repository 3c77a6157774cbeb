use crate::bridge::model::{
    CartView, MessageBody, PricebookListing, QuantityUpdate, ScannerView, UploadRequest,
};
use crate::workflow::register::Register;
use log::{info, warn};
use poscore::capture::RawDetection;
use poscore::pos::{ManualEntry, PaymentMethod};
use poscore::PosError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Register state shared by every request handler.
pub type SharedRegister = Arc<Mutex<Register>>;

const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
const MAX_JSON_BYTES: u64 = 64 * 1024;

fn lock(register: &SharedRegister) -> MutexGuard<'_, Register> {
    register.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_register(
    register: SharedRegister,
) -> impl Filter<Extract = (SharedRegister,), Error = Infallible> + Clone {
    warp::any().map(move || register.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_JSON_BYTES).and(warp::body::json())
}

fn json_reply<T: Serialize>(status: StatusCode, body: &T) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

fn error_reply(err: &PosError) -> Response {
    let status = match err {
        PosError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    json_reply(status, &MessageBody::new(err.to_string()))
}

fn upload_pricebook(body: UploadRequest, register: SharedRegister) -> Response {
    let report = lock(&register).pricebook_mut().import(&body.rows);
    if report.success {
        info!("{}", report.message);
        json_reply(StatusCode::OK, &report)
    } else {
        warn!("pricebook upload rejected: {}", report.message);
        json_reply(StatusCode::BAD_REQUEST, &report)
    }
}

fn lookup_product(barcode: String, register: SharedRegister) -> Response {
    let guard = lock(&register);
    match guard.pricebook().lookup(&barcode) {
        Ok(product) => json_reply(StatusCode::OK, product),
        Err(err) => error_reply(&err),
    }
}

fn list_pricebook(register: SharedRegister) -> Response {
    let guard = lock(&register);
    json_reply(StatusCode::OK, &PricebookListing::from(guard.pricebook()))
}

fn clear_pricebook(register: SharedRegister) -> Response {
    lock(&register).pricebook_mut().clear();
    json_reply(StatusCode::OK, &MessageBody::new("Pricebook cleared"))
}

fn scanner_view(register: &Register) -> ScannerView {
    ScannerView {
        scanning: register.is_scanning(),
        status: register.scanner_status(Instant::now()),
    }
}

fn start_scanner(register: SharedRegister) -> Response {
    let mut guard = lock(&register);
    match guard.start_scanning() {
        Ok(()) => json_reply(StatusCode::OK, &scanner_view(&guard)),
        Err(err) => error_reply(&err),
    }
}

fn stop_scanner(register: SharedRegister) -> Response {
    let mut guard = lock(&register);
    guard.stop_scanning();
    json_reply(StatusCode::OK, &scanner_view(&guard))
}

fn scanner_status(register: SharedRegister) -> Response {
    json_reply(StatusCode::OK, &scanner_view(&lock(&register)))
}

fn detect(raw: RawDetection, register: SharedRegister) -> Response {
    let outcome = lock(&register).detect(raw, Instant::now());
    json_reply(StatusCode::OK, &outcome)
}

fn view_cart(register: SharedRegister) -> Response {
    json_reply(StatusCode::OK, &CartView::from(lock(&register).cart()))
}

fn clear_cart(register: SharedRegister) -> Response {
    let mut guard = lock(&register);
    guard.cart_mut().clear();
    json_reply(StatusCode::OK, &CartView::from(guard.cart()))
}

fn update_quantity(id: String, update: QuantityUpdate, register: SharedRegister) -> Response {
    let mut guard = lock(&register);
    match guard.cart_mut().update_quantity(&id, update.quantity) {
        Ok(_) => json_reply(StatusCode::OK, &CartView::from(guard.cart())),
        Err(err) => error_reply(&err),
    }
}

fn remove_item(id: String, register: SharedRegister) -> Response {
    let mut guard = lock(&register);
    match guard.cart_mut().remove(&id) {
        Ok(_) => json_reply(StatusCode::OK, &CartView::from(guard.cart())),
        Err(err) => error_reply(&err),
    }
}

fn add_manual(entry: ManualEntry, register: SharedRegister) -> Response {
    let mut guard = lock(&register);
    match guard.add_manual(entry) {
        Ok(_) => json_reply(StatusCode::CREATED, &CartView::from(guard.cart())),
        Err(err) => error_reply(&err),
    }
}

fn checkout(method: PaymentMethod, register: SharedRegister) -> Response {
    match lock(&register).checkout(method) {
        Ok(receipt) => json_reply(StatusCode::OK, &receipt),
        Err(err) => error_reply(&err),
    }
}

/// Every register endpoint under `/api`.
pub fn routes(register: SharedRegister) -> BoxedFilter<(Response,)> {
    let state = with_register(register);

    let upload = warp::path!("api" / "pricebook" / "upload")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_UPLOAD_BYTES))
        .and(warp::body::json())
        .and(state.clone())
        .map(upload_pricebook);
    let lookup = warp::path!("api" / "pricebook" / "lookup" / String)
        .and(warp::get())
        .and(state.clone())
        .map(lookup_product);
    let list = warp::path!("api" / "pricebook")
        .and(warp::get())
        .and(state.clone())
        .map(list_pricebook);
    let clear = warp::path!("api" / "pricebook")
        .and(warp::delete())
        .and(state.clone())
        .map(clear_pricebook);

    let start = warp::path!("api" / "scanner" / "start")
        .and(warp::post())
        .and(state.clone())
        .map(start_scanner);
    let stop = warp::path!("api" / "scanner" / "stop")
        .and(warp::post())
        .and(state.clone())
        .map(stop_scanner);
    let status = warp::path!("api" / "scanner" / "status")
        .and(warp::get())
        .and(state.clone())
        .map(scanner_status);
    let detect_route = warp::path!("api" / "scanner" / "detect")
        .and(warp::post())
        .and(json_body())
        .and(state.clone())
        .map(detect);

    let cart = warp::path!("api" / "cart")
        .and(warp::get())
        .and(state.clone())
        .map(view_cart);
    let empty_cart = warp::path!("api" / "cart")
        .and(warp::delete())
        .and(state.clone())
        .map(clear_cart);
    let manual = warp::path!("api" / "cart" / "manual")
        .and(warp::post())
        .and(json_body())
        .and(state.clone())
        .map(add_manual);
    let quantity = warp::path!("api" / "cart" / String)
        .and(warp::put())
        .and(json_body())
        .and(state.clone())
        .map(update_quantity);
    let remove = warp::path!("api" / "cart" / String)
        .and(warp::delete())
        .and(state.clone())
        .map(remove_item);

    let pay = warp::path!("api" / "checkout")
        .and(warp::post())
        .and(json_body())
        .and(state)
        .map(checkout);

    let pricebook = upload.or(lookup).unify().or(list).unify().or(clear).unify();
    let scanner = start
        .or(stop)
        .unify()
        .or(status)
        .unify()
        .or(detect_route)
        .unify();
    let sale = cart
        .or(empty_cart)
        .unify()
        .or(manual)
        .unify()
        .or(quantity)
        .unify()
        .or(remove)
        .unify()
        .or(pay)
        .unify();

    pricebook.or(scanner).unify().or(sale).unify().boxed()
}

/// Routes plus JSON error bodies for rejected requests.
pub fn app(
    register: SharedRegister,
) -> impl Filter<Extract = (Response,), Error = Infallible> + Clone {
    routes(register).recover(handle_rejection).unify()
}

async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(err) = rejection.find::<warp::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, err.to_string())
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Upload too large".to_string())
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        warn!("unhandled rejection: {:?}", rejection);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };
    Ok(json_reply(status, &MessageBody::new(message)))
}
