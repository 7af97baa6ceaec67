pub mod form_field;
pub mod kpi_card;
pub mod toast;
