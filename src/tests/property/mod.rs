mod registration_props;
mod standings_props;
