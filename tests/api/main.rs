// all api tests live in one binary; see `helpers` for `spawn_app`
mod health_check;
mod helpers;
mod navigation;
