pub(crate) mod http_api;
