//! The interactive contact form embedded in the marketing pages.
//!
//! [`form::ContactForm`] owns everything the form displays and changes only
//! through its methods. [`api::ContactApi`] talks to the relay endpoint.

pub mod api;
pub mod form;

use yzagere_shared_contracts::time::TimeService;

use crate::{api::ContactApi, form::ContactForm};

/// Runs a full submission: client-side validation, the request to the relay
/// endpoint and the resulting state transition.
///
/// Returns `false` if nothing was sent, either because the form has errors or
/// because a submission is already in flight.
pub async fn submit(
    form: &mut ContactForm,
    api: &impl ContactApi,
    time: &impl TimeService,
) -> bool {
    let Some(payload) = form.begin_submit() else {
        return false;
    };

    let result = api.submit(&payload).await;
    if let Err(err) = &result {
        tracing::error!("Form submission error: {err:#}");
    }

    form.finish_submit(result, time.now());
    true
}
