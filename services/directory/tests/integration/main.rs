mod department_test;
mod org_test;
mod router_test;
