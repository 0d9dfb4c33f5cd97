mod helpers;
mod router_test;
mod user_test;
