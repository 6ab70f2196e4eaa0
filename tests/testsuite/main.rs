automod::dir!("tests/testsuite");
