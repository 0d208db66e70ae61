pub mod table_webhook;
