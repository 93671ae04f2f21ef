mod helpers;

mod link_test;
mod second_factor_test;
mod session_route_test;
