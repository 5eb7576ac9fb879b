
mod learning_test;
