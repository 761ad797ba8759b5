//! Mount descriptors for the business modules.
//!
//! Each module owns its handlers; this file only declares where they live.
//! News, payments and trial carry their own `/api/v1/...` paths and are
//! mounted as-is.

use crate::config::Config;
use crate::routes::profile::handle_get_profile;
use crate::routes::{not_implemented, RouteMount};

pub fn business_mounts(config: &Config) -> Vec<RouteMount> {
    let mut mounts = vec![
        resume(),
        generate(),
        enhance(),
        compare(),
        feedback(),
        parse(),
        auth_reset(),
        auth(),
        resume_cover(),
        jobs(),
        profile(),
    ];
    if config.enable_jobs_debug {
        mounts.push(jobs_debug());
    }
    mounts.extend([news(), payments(), trial()]);
    mounts
}

fn resume() -> RouteMount {
    RouteMount::versioned("resume", "/resume")
        .post("/upload", not_implemented)
        .get("/list", not_implemented)
}

fn generate() -> RouteMount {
    RouteMount::versioned("generate", "/generate").post("", not_implemented)
}

fn enhance() -> RouteMount {
    RouteMount::versioned("enhance", "/enhance").post("", not_implemented)
}

fn compare() -> RouteMount {
    RouteMount::versioned("compare", "/compare").post("", not_implemented)
}

fn feedback() -> RouteMount {
    RouteMount::versioned("feedback", "/feedback").post("", not_implemented)
}

fn parse() -> RouteMount {
    RouteMount::versioned("parse", "/parse").post("", not_implemented)
}

fn auth_reset() -> RouteMount {
    RouteMount::versioned("auth_reset", "/auth")
        .post("/forgot-otp", not_implemented)
        .post("/verify-otp", not_implemented)
        .post("/reset-with-otp", not_implemented)
}

fn auth() -> RouteMount {
    RouteMount::versioned("auth", "/auth")
        .post("/login", not_implemented)
        .post("/signup", not_implemented)
        .post("/refresh", not_implemented)
        .get("/me", not_implemented)
}

/// `/resume-cover` is public, `/resume-cover/save` is not.
fn resume_cover() -> RouteMount {
    RouteMount::versioned("resume_cover", "/resume-cover")
        .post("", not_implemented)
        .post("/save", not_implemented)
}

fn jobs() -> RouteMount {
    RouteMount::versioned("jobs", "/jobs").get("/search", not_implemented)
}

fn jobs_debug() -> RouteMount {
    RouteMount::versioned("jobs_debug", "/jobs-debug").get("/raw", not_implemented)
}

fn profile() -> RouteMount {
    RouteMount::versioned("profile", "/profile")
        .get("", handle_get_profile)
        .put("", not_implemented)
}

fn news() -> RouteMount {
    RouteMount::absolute("news").get("/api/v1/news/jobs", not_implemented)
}

fn payments() -> RouteMount {
    RouteMount::absolute("payments")
        .post("/api/v1/pay/checkout", not_implemented)
        .post("/api/v1/pay/webhook", not_implemented)
        .get("/api/v1/pay/status", not_implemented)
}

fn trial() -> RouteMount {
    RouteMount::absolute("trial")
        .post("/api/v1/trial/start", not_implemented)
        .get("/api/v1/trial/status", not_implemented)
}
