mod scenario_test;

use rstest::*;

use crate::prelude::*;
