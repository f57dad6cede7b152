mod line_relay;
