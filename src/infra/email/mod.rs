pub mod http_mail_transport;
