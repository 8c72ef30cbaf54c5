mod controllers;
mod periodic;
mod services;

pub(crate) use controllers::build_http_router;
pub(crate) use periodic::build_periodic_tasks_deps;
pub(crate) use services::{CoreBootstrap, build_core};
