mod component_manager_tests;
mod engine_tests;
