//! QuoteResolved system: applies the route collaborator's response to the
//! session, or discards it when a newer request superseded it.

use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject};
use crate::fare::FareConfig;
use crate::notify::NotificationSinkResource;
use crate::routing::{self, RouteServiceResource};
use crate::session::{RidePhase, RideSession};

pub fn quote_resolved_system(
    event: Res<CurrentEvent>,
    route_service: Res<RouteServiceResource>,
    fare: Res<FareConfig>,
    notifier: Res<NotificationSinkResource>,
    mut session: ResMut<RideSession>,
) {
    if event.0.kind != EventKind::QuoteResolved {
        return;
    }
    let Some(EventSubject::Generation(generation)) = event.0.subject else {
        return;
    };
    if generation != session.generation {
        log::debug!(
            "discarding stale quote response (generation {generation}, session at {})",
            session.generation
        );
        return;
    }
    if session.phase != RidePhase::Quoting {
        return;
    }
    let (Some(origin), Some(destination)) = (session.origin, session.destination) else {
        return;
    };

    match routing::build_quote(route_service.0.as_ref(), &fare, origin, destination) {
        Ok(quote) => {
            session.quote = Some(quote);
            session.phase = RidePhase::Quoted;
        }
        Err(err) => {
            log::debug!("quote failed: {err}");
            session.quote = None;
            session.phase = RidePhase::Idle;
            notifier.0.error("No route found between these points.");
        }
    }
}
