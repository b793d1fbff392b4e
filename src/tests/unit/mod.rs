mod app_state;
mod registration_flow;
