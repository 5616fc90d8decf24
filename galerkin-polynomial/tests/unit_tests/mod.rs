mod polynomial;
