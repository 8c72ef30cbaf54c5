pub(crate) mod ledger_registration;
pub(crate) mod node_publish;
