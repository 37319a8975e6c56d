pub(crate) mod arp_table;
pub(crate) mod command;
