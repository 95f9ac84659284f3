use actix_web::HttpResponse;
use actix_web_flash_messages::FlashMessage;
use pushkind_common::routes::{redirect, render_template};
use tera::{Context, Tera};

use crate::views::{ServiceError, ServiceResult, ViewResponse};

pub mod products;
pub mod reviews;

/// Turn the outcome of a view into a response.
///
/// `context` carries the page-wide values and is extended with the view's own.
/// Missing and refused records both answer 404.
pub fn respond(
    result: ServiceResult<ViewResponse>,
    tera: &Tera,
    mut context: Context,
    action: &str,
) -> HttpResponse {
    match result {
        Ok(ViewResponse::Render {
            template,
            context: view_context,
        }) => {
            context.extend(view_context);
            render_template(tera, template, &context)
        }
        Ok(ViewResponse::Redirect { location, message }) => {
            if let Some(message) = message {
                FlashMessage::success(message).send();
            }
            redirect(&location)
        }
        Err(ServiceError::NotFound) => {
            log::debug!("Nothing found to {action}");
            HttpResponse::NotFound().finish()
        }
        Err(ServiceError::Unauthorized) => {
            log::warn!("Refused to {action}");
            HttpResponse::NotFound().finish()
        }
        Err(err) => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
