quantity!(Volts, f64, "V");
