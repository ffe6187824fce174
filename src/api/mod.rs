pub mod match_response;
