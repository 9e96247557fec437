mod common;
mod test_island_run;
mod test_variation;
